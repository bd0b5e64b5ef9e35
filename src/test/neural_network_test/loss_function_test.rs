use super::*;

#[test]
fn test_mse_compute_loss() {
    let mse = MeanSquaredError::new();
    let y_true = array![[0.0, 1.0], [2.0, 3.0]];
    let y_pred = array![[1.0, 1.0], [2.0, 1.0]];

    // (1 + 0 + 0 + 4) / 4
    assert_relative_eq!(mse.compute_loss(&y_true, &y_pred).unwrap(), 1.25);
    assert_relative_eq!(mse.compute_loss(&y_true, &y_true).unwrap(), 0.0);
}

#[test]
fn test_mse_compute_loss_errors() {
    let mse = MeanSquaredError::new();
    let result = mse.compute_loss(&Array2::zeros((1, 3)), &Array2::zeros((1, 2)));
    assert!(matches!(result, Err(ModelError::ShapeMismatch { .. })));

    let empty = Array2::<f32>::zeros((0, 3));
    let result = mse.compute_loss(&empty, &empty);
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
}

#[test]
fn test_mse_record_matches_compute_loss() {
    let mse = MeanSquaredError::new();
    let y_true = array![[0.5, -0.5, 1.0]];
    let y_pred = array![[0.0, 0.5, 0.25]];

    let mut tape = Tape::new();
    let target = tape.leaf(y_true.clone());
    let prediction = tape.leaf(y_pred.clone());
    let loss = mse.record(&mut tape, target, prediction).unwrap();

    assert_abs_diff_eq!(
        tape.scalar(loss).unwrap(),
        mse.compute_loss(&y_true, &y_pred).unwrap(),
        epsilon = 1e-6
    );

    // d/dp mean((p - t)^2) = 2 (p - t) / n
    let grads = tape.gradients(loss, &[prediction]).unwrap();
    let expected = (&y_pred - &y_true) * (2.0 / 3.0);
    for (g, e) in grads[0].iter().zip(expected.iter()) {
        assert_abs_diff_eq!(g, e, epsilon = 1e-6);
    }
}
