use super::*;
use crate::math::{sigmoid, tanh};
use ndarray::concatenate;

/// Plain ndarray evaluation of the LSTM equations
fn reference_step(
    input_t: &Array2<f32>,
    h_prev: &Array2<f32>,
    c_prev: &Array2<f32>,
    params: &LSTMParameters,
) -> (Array2<f32>, Array2<f32>) {
    let x = concatenate(Axis(1), &[input_t.view(), h_prev.view()]).unwrap();
    let pre = |kind: GateKind| {
        let gate = params.gate(kind);
        x.dot(gate.weight()) + gate.bias()
    };

    let i = pre(GateKind::Input).mapv(sigmoid);
    let f = pre(GateKind::Forget).mapv(sigmoid);
    let o = pre(GateKind::Output).mapv(sigmoid);
    let u = pre(GateKind::CellUpdate).mapv(tanh);

    let c = &f * c_prev + &i * &u;
    let h = &o * &c.mapv(tanh);
    (h, c)
}

/// Zero weights everywhere, with a constant bias on the cell update gate
fn midpoint_params(input_dim: usize, hidden_dim: usize, update_bias: f32) -> LSTMParameters {
    let zeros = || Gate::zeros(input_dim, hidden_dim).unwrap();
    let update = Gate::new(
        Array2::zeros((input_dim + hidden_dim, hidden_dim)),
        Array2::from_elem((1, hidden_dim), update_bias),
    )
    .unwrap();
    LSTMParameters::from_gates(zeros(), zeros(), update, zeros()).unwrap()
}

#[test]
fn test_step_matches_reference_equations() {
    let params = seeded_params(3, 4, 11);
    let input_t = array![[0.5, -1.0, 2.0], [0.0, 0.3, -0.7]];
    let h_prev = array![[0.1, -0.2, 0.3, 0.0], [0.5, 0.5, -0.5, 0.2]];
    let c_prev = array![[1.0, -1.5, 0.2, 0.0], [-0.3, 2.0, 0.7, -1.0]];

    let (h_t, c_t) = step(&input_t, &h_prev, &c_prev, &params).unwrap();
    let (h_ref, c_ref) = reference_step(&input_t, &h_prev, &c_prev, &params);

    assert_eq!(h_t.dim(), (2, 4));
    assert_eq!(c_t.dim(), (2, 4));
    for (a, b) in h_t.iter().zip(h_ref.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }
    for (a, b) in c_t.iter().zip(c_ref.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-5);
    }
}

#[test]
fn test_step_hidden_state_is_bounded() {
    let params = seeded_params(3, 4, 5);
    let input_t = array![[10.0, -8.0, 25.0]];
    let h_prev = array![[0.9, -0.9, 0.5, -0.1]];
    let c_prev = array![[50.0, -50.0, 3.0, -3.0]];

    let (h_t, _) = step(&input_t, &h_prev, &c_prev, &params).unwrap();
    assert!(h_t.iter().all(|&v| v.abs() <= 1.0));
}

#[test]
fn test_step_cell_state_is_midpoint_with_zero_weights() {
    // Every sigmoid gate is exactly 0.5, so c_t = (c_prev + u_t) / 2
    let update_bias = 0.8;
    let params = midpoint_params(2, 3, update_bias);
    let input_t = array![[1.0, -2.0]];
    let h_prev = array![[0.2, 0.4, -0.6]];
    let c_prev = array![[1.0, -1.0, 0.25]];

    let (_, c_t) = step(&input_t, &h_prev, &c_prev, &params).unwrap();
    let u = tanh(update_bias);
    for (&c, &prev) in c_t.iter().zip(c_prev.iter()) {
        assert_abs_diff_eq!(c, 0.5 * (prev + u), epsilon = 1e-6);
        assert!(c >= prev.min(u) && c <= prev.max(u));
    }
}

#[test]
fn test_step_cell_state_within_gate_bounds() {
    // With f, i in (0, 1) and u in (-1, 1): c_t lies between
    // min(0, c_prev) + min(0, u) and max(0, c_prev) + max(0, u)
    let params = seeded_params(3, 4, 21);
    let input_t = array![[0.4, -0.3, 1.2]];
    let h_prev = array![[0.1, 0.2, -0.3, 0.4]];
    let c_prev = array![[2.0, -2.0, 0.5, -0.1]];

    let (_, c_t) = step(&input_t, &h_prev, &c_prev, &params).unwrap();
    let (_, reference_c) = reference_step(&input_t, &h_prev, &c_prev, &params);
    let x = concatenate(Axis(1), &[input_t.view(), h_prev.view()]).unwrap();
    let gate = params.gate(GateKind::CellUpdate);
    let u = (x.dot(gate.weight()) + gate.bias()).mapv(tanh);

    for ((&c, &prev), &u) in c_t.iter().zip(c_prev.iter()).zip(u.iter()) {
        let low = prev.min(0.0) + u.min(0.0);
        let high = prev.max(0.0) + u.max(0.0);
        assert!(c >= low - 1e-6 && c <= high + 1e-6, "{} not in [{}, {}]", c, low, high);
    }
    assert_eq!(c_t.dim(), reference_c.dim());
}

#[test]
fn test_step_zero_params_keep_zero_state() {
    let params = LSTMParameters::zeros(3, 2).unwrap();
    let (h0, c0) = zero_state(4, 2);
    let input_t = Array2::from_elem((4, 3), 3.0);

    let (h1, c1) = step(&input_t, &h0, &c0, &params).unwrap();
    assert_eq!(h1, Array2::<f32>::zeros((4, 2)));
    assert_eq!(c1, Array2::<f32>::zeros((4, 2)));
}

#[test]
fn test_step_does_not_modify_arguments() {
    let params = seeded_params(3, 4, 2);
    let snapshot = params.clone();
    let input_t = array![[0.1, 0.2, 0.3]];
    let h_prev = array![[0.0, 0.1, 0.0, -0.1]];
    let c_prev = array![[0.5, 0.5, 0.5, 0.5]];

    let first = step(&input_t, &h_prev, &c_prev, &params).unwrap();
    let second = step(&input_t, &h_prev, &c_prev, &params).unwrap();

    assert_eq!(params, snapshot);
    assert_eq!(h_prev, array![[0.0, 0.1, 0.0, -0.1]]);
    assert_eq!(first, second);
}

#[test]
fn test_step_shape_mismatch() {
    let params = seeded_params(3, 4, 0);
    let (h0, c0) = zero_state(1, 4);

    // Wrong input width
    let result = step(&array![[1.0, 2.0]], &h0, &c0, &params);
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));

    // Hidden state of the wrong width
    let result = step(&array![[1.0, 2.0, 3.0]], &array![[0.0, 0.0]], &c0, &params);
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));

    // Batch sizes disagree
    let input_t = Array2::zeros((2, 3));
    let result = step(&input_t, &h0, &c0, &params);
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));

    // Cell state batch differs from the hidden state
    let result = step(&array![[1.0, 2.0, 3.0]], &h0, &Array2::zeros((2, 4)), &params);
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
}

#[test]
fn test_step_on_tape_gradients_reach_every_parameter() {
    let params = seeded_params(2, 3, 4);
    let mut tape = Tape::new();
    let vars = params.record(&mut tape);
    let x = tape.leaf(array![[0.3, -0.6]]);
    let h = tape.leaf(Array2::zeros((1, 3)));
    let c = tape.leaf(Array2::zeros((1, 3)));

    let (h_t, _) = step_on_tape(&mut tape, x, h, c, &vars).unwrap();
    let loss = tape.mean(h_t).unwrap();
    let grads = tape.gradients(loss, &vars.leaves()).unwrap();

    assert_eq!(grads.len(), 8);
    for (grad, tensor) in grads.iter().zip(params.tensors()) {
        assert_eq!(grad.dim(), tensor.dim());
        assert!(grad.iter().all(|g| g.is_finite()));
    }
}

#[test]
fn test_step_on_tape_gradient_matches_finite_difference() {
    let params = seeded_params(2, 2, 8);
    let input_t = array![[0.7, -0.4]];
    let h_prev = array![[0.2, -0.1]];
    let c_prev = array![[0.5, -0.3]];

    let loss_of = |p: &LSTMParameters| {
        let (h, c) = step(&input_t, &h_prev, &c_prev, p).unwrap();
        h.sum() + 0.5 * c.sum()
    };

    let mut tape = Tape::new();
    let vars = params.record(&mut tape);
    let x = tape.leaf(input_t.clone());
    let h = tape.leaf(h_prev.clone());
    let c = tape.leaf(c_prev.clone());
    let (h_t, c_t) = step_on_tape(&mut tape, x, h, c, &vars).unwrap();
    let h_mean = tape.mean(h_t).unwrap();
    let c_mean = tape.mean(c_t).unwrap();
    // two hidden units: sum(h) = 2 * mean(h) and 0.5 * sum(c) = mean(c)
    let h_sum = tape.scale(h_mean, 2.0);
    let loss = tape.add(h_sum, c_mean).unwrap();
    let grads = tape.gradients(loss, &vars.leaves()).unwrap();

    let step_size = 1e-2;
    for (slot, analytic) in grads.iter().enumerate() {
        for ((i, j), &g) in analytic.indexed_iter() {
            let mut plus = params.clone();
            let mut minus = params.clone();
            {
                let mut tensors = plus.tensors_mut();
                tensors[slot][[i, j]] += step_size;
            }
            {
                let mut tensors = minus.tensors_mut();
                tensors[slot][[i, j]] -= step_size;
            }
            let numeric = (loss_of(&plus) - loss_of(&minus)) / (2.0 * step_size);
            assert_abs_diff_eq!(g, numeric, epsilon = 2e-3);
        }
    }
}
