// Trains small sigmoid models on the OR, AND and XOR truth tables.
//   RUST_LOG=info cargo run --example logic_gates
use densenet::{
    Adam, Dataset, Evaluate, Model, Optimizer, QuadraticLoss, Sgd, Sigmoid, Trainer,
};

const INPUTS: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

fn gate(outputs: [f64; 4]) -> Dataset {
    INPUTS
        .iter()
        .zip(outputs)
        .map(|(&input, out)| densenet::DatasetEntry::new(input, [out]))
        .collect()
}

fn run<O: Optimizer>(name: &str, hidden: &[usize], optimizer: O, dataset: &Dataset, lr: f64) {
    let mut model = Model::new();
    model.input(2);
    for &width in hidden {
        model.push_layer(width);
    }
    model.push_layer(1).init(42);

    let mut trainer = Trainer::new(model, Sigmoid, QuadraticLoss, optimizer);
    trainer.train_with_trace(dataset, 10_000, lr, &mut |epoch: usize, eval: &dyn Evaluate| {
        if epoch % 2_000 == 0 {
            println!("  [{name}] epoch {epoch}: cost = {:.6}", eval.evaluate(dataset).cost);
        }
    });

    println!("{name}:");
    for entry in dataset.iter() {
        println!(
            "  {:?} -> {:.4} (expected {})",
            entry.input.as_slice(),
            trainer.predict(&entry.input)[0],
            entry.ground_truth[0]
        );
    }
}

fn main() {
    env_logger::init();

    let or = gate([0.0, 1.0, 1.0, 1.0]);
    let and = gate([0.0, 0.0, 0.0, 1.0]);
    let xor = gate([0.0, 1.0, 1.0, 0.0]);

    run("OR  / sgd  / 2-2-1", &[2], Sgd::new(), &or, 2.0);
    run("AND / sgd  / 2-2-1", &[2], Sgd::new(), &and, 2.0);
    // Two hidden units need far more epochs on XOR than on OR or AND.
    run("XOR / sgd  / 2-2-1", &[2], Sgd::new(), &xor, 2.0);
    run("XOR / adam / 2-4-4-1", &[4, 4], Adam::new(), &xor, 0.05);
}
