use super::*;

#[test]
fn test_gate_new() {
    let gate = Gate::new(Array2::zeros((5, 2)), Array2::zeros((1, 2))).unwrap();
    assert_eq!(gate.input_width(), 5);
    assert_eq!(gate.hidden_dim(), 2);

    // Bias must be a single row matching the weight columns
    let result = Gate::new(Array2::zeros((5, 2)), Array2::zeros((1, 3)));
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
    let result = Gate::new(Array2::zeros((5, 2)), Array2::zeros((2, 2)));
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));

    // Zero dimensions are rejected
    let result = Gate::new(Array2::zeros((0, 2)), Array2::zeros((1, 2)));
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
}

#[test]
fn test_gate_with_rng() {
    let mut rng = StdRng::seed_from_u64(1);
    let gate = Gate::with_rng(3, 4, &mut rng).unwrap();
    assert_eq!(gate.weight().dim(), (7, 4));
    assert_eq!(gate.bias(), &Array2::<f32>::zeros((1, 4)));
    assert!(gate.weight().iter().all(|w| w.is_finite()));
    assert!(gate.weight().iter().any(|&w| w != 0.0));
}

#[test]
fn test_lstm_parameters_shapes() {
    let params = seeded_params(3, 4, 0);
    assert_eq!(params.input_dim(), 3);
    assert_eq!(params.hidden_dim(), 4);
    // 4 gates * (7 * 4 weights + 4 biases)
    assert_eq!(params.param_count(), 128);

    for kind in GateKind::ALL {
        let gate = params.gate(kind);
        assert_eq!(gate.weight().dim(), (7, 4), "{} gate", kind.name());
        assert_eq!(gate.bias().dim(), (1, 4), "{} gate", kind.name());
    }

    let counted: usize = params.tensors().iter().map(|t| t.len()).sum();
    assert_eq!(counted, params.param_count());
}

#[test]
fn test_lstm_parameters_reject_zero_dimensions() {
    assert!(matches!(
        LSTMParameters::zeros(0, 4),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        LSTMParameters::zeros(3, 0),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_lstm_parameters_seeded_init_is_reproducible() {
    assert_eq!(seeded_params(3, 4, 9), seeded_params(3, 4, 9));
    assert_ne!(seeded_params(3, 4, 9), seeded_params(3, 4, 10));
}

#[test]
fn test_lstm_parameters_from_gates() {
    let gates = || Gate::zeros(2, 3).unwrap();
    let params = LSTMParameters::from_gates(gates(), gates(), gates(), gates()).unwrap();
    assert_eq!(params.input_dim(), 2);
    assert_eq!(params.hidden_dim(), 3);
    assert_eq!(params, LSTMParameters::zeros(2, 3).unwrap());

    // One gate of the wrong width
    let result = LSTMParameters::from_gates(gates(), gates(), Gate::zeros(4, 3).unwrap(), gates());
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));
}
