use densenet::{
    DatasetEntry, Evaluate, Layer, Matrix, Model, QuadraticLoss, Sgd, Sigmoid, Trainer, Vector,
};

fn identity_trainer() -> Trainer<Sigmoid, QuadraticLoss, Sgd> {
    let mut model = Model::new();
    model.add_layer(2, 2);
    model.layers_mut()[0] = Layer::from_parts(
        Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]),
        Vector::zeros(2),
    );
    Trainer::new(model, Sigmoid, QuadraticLoss, Sgd::new())
}

#[test]
fn accuracy_counts_argmax_matches() {
    let t = identity_trainer();
    let dataset = vec![
        DatasetEntry::new([1.0, 0.0], [1.0, 0.0]),
        DatasetEntry::new([0.0, 1.0], [0.0, 1.0]),
        DatasetEntry::new([2.0, 0.0], [0.0, 1.0]),
        DatasetEntry::new([0.0, 3.0], [0.0, 1.0]),
    ];
    assert_eq!(t.evaluate_accuracy(&dataset), 75.0);
}

#[test]
fn cost_is_averaged_over_units_and_samples() {
    let t = identity_trainer();
    // Both outputs are sigmoid(0) = 0.5, so each unit costs 0.5 * 0.5^2.
    let one = vec![DatasetEntry::new([0.0, 0.0], [1.0, 0.0])];
    assert!((t.evaluate_cost(&one) - 0.125).abs() < 1e-15);

    let two = vec![
        DatasetEntry::new([0.0, 0.0], [1.0, 0.0]),
        DatasetEntry::new([0.0, 0.0], [0.5, 0.5]),
    ];
    let eval = t.evaluate(&two);
    assert!((eval.cost - 0.0625).abs() < 1e-15);
    assert_eq!(eval.accuracy, 100.0);
}

#[test]
fn empty_dataset_scores_zero() {
    let t = identity_trainer();
    let (cost, accuracy): (f64, f64) = t.evaluate(&[]).into();
    assert_eq!(cost, 0.0);
    assert_eq!(accuracy, 0.0);
}
