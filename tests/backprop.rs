use densenet::{
    Cost, Dataset, DatasetEntry, Layer, Matrix, Model, QuadraticLoss, Sgd, Sigmoid, Trainer,
    Vector,
};

fn assert_close(got: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (got - expected).abs() <= tol,
        "{what}: got {got}, expected {expected} (tol {tol})"
    );
}

fn trainer(model: Model) -> Trainer<Sigmoid, QuadraticLoss, Sgd> {
    Trainer::new(model, Sigmoid, QuadraticLoss, Sgd::new())
}

fn sample_cost(t: &Trainer<Sigmoid, QuadraticLoss, Sgd>, entry: &DatasetEntry) -> f64 {
    QuadraticLoss
        .map(&entry.ground_truth, &t.predict(&entry.input))
        .sum()
}

#[test]
fn compute_z_is_exact() {
    let layer = Layer::from_parts(
        Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
        Vector::from([1.0, 2.0]),
    );
    let mut model = Model::new();
    model.add_layer(2, 2);
    let t = trainer(model);
    let z = t.compute_z(&layer, &Vector::from([10.0, 100.0]));
    assert_eq!(z.as_slice(), &[211.0, 432.0]);
}

#[test]
fn feedforward_keeps_every_stage() {
    let mut model = Model::new();
    model.add_layer(3, 4).add_layer(4, 2).init(1);
    let t = trainer(model);
    let pass = t.feedforward(&Vector::from([0.1, 0.2, 0.3]));
    assert_eq!(pass.activations.len(), 3);
    assert_eq!(pass.zs.len(), 2);
    assert_eq!(pass.activations[1].len(), 4);
    assert_eq!(pass.output().len(), 2);
    for (z, a) in pass.zs.iter().zip(&pass.activations[1..]) {
        for (&z, &a) in z.iter().zip(a.iter()) {
            assert_close(a, 1.0 / (1.0 + (-z).exp()), 1e-15, "activation");
        }
    }
}

#[test]
fn backpropagation_matches_finite_differences() {
    let mut model = Model::new();
    model.add_layer(3, 4).add_layer(4, 3).add_layer(3, 2).init(3);
    let mut t = trainer(model);
    let entry = DatasetEntry::new([0.2, -0.4, 0.7], [1.0, 0.0]);

    let pass = t.feedforward(&entry.input);
    let grads = t.backpropagate(&entry.ground_truth, &pass);
    assert_eq!(grads.len(), 3);

    let h = 1e-5;
    for l in 0..t.model().len() {
        let (rows, cols) = t.model().layers()[l].weights.shape();
        for j in 0..rows {
            for k in 0..cols {
                t.model_mut().layers_mut()[l].weights[j][k] += h;
                let plus = sample_cost(&t, &entry);
                t.model_mut().layers_mut()[l].weights[j][k] -= 2.0 * h;
                let minus = sample_cost(&t, &entry);
                t.model_mut().layers_mut()[l].weights[j][k] += h;

                let numeric = (plus - minus) / (2.0 * h);
                assert_close(grads.weights[l][j][k], numeric, 1e-6, "weight gradient");
            }
            t.model_mut().layers_mut()[l].biases[j] += h;
            let plus = sample_cost(&t, &entry);
            t.model_mut().layers_mut()[l].biases[j] -= 2.0 * h;
            let minus = sample_cost(&t, &entry);
            t.model_mut().layers_mut()[l].biases[j] += h;

            let numeric = (plus - minus) / (2.0 * h);
            assert_close(grads.biases[l][j], numeric, 1e-6, "bias gradient");
        }
    }
}

#[test]
fn update_minibatch_averages_gradients() {
    let mut model = Model::new();
    model.add_layer(2, 2).add_layer(2, 1).init(8);
    let entries = vec![
        DatasetEntry::new([0.0, 1.0], [1.0]),
        DatasetEntry::new([1.0, 0.0], [0.0]),
    ];

    let probe = trainer(model.clone());
    let mut expected = model.clone();
    let g0 = probe.backpropagate(&entries[0].ground_truth, &probe.feedforward(&entries[0].input));
    let g1 = probe.backpropagate(&entries[1].ground_truth, &probe.feedforward(&entries[1].input));
    for (l, layer) in expected.layers_mut().iter_mut().enumerate() {
        let mut w = g0.weights[l].clone();
        w += &g1.weights[l];
        let mut b = g0.biases[l].clone();
        b += &g1.biases[l];
        layer.weights.scaled_sub(0.5 * 0.3, &w);
        layer.biases.scaled_sub(0.5 * 0.3, &b);
    }

    let mut t = trainer(model);
    assert_eq!(t.update_minibatch(&entries, 0.3), 2);
    for (got, want) in t.model().layers().iter().zip(expected.layers()) {
        for (x, y) in got.weights.as_slice().iter().zip(want.weights.as_slice()) {
            assert_close(*x, *y, 1e-12, "weight");
        }
        for (x, y) in got.biases.iter().zip(want.biases.iter()) {
            assert_close(*x, *y, 1e-12, "bias");
        }
    }
}

#[test]
fn empty_minibatch_leaves_model_untouched() {
    let mut model = Model::new();
    model.add_layer(2, 1).init(2);
    let before = model.clone();
    let mut t = trainer(model);
    let empty: Dataset = Dataset::default();
    assert_eq!(t.update_minibatch(empty.iter(), 1.0), 0);
    assert_eq!(t.model(), &before);
}
