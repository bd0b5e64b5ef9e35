use crate::error::ModelError;
use ndarray::Array2;

/// Validates that the learning rate is positive and finite.
///
/// # Parameters
///
/// * `learning_rate` - The learning rate value to validate
///
/// # Returns
///
/// - `Ok(())` if the learning rate is positive and finite
/// - `Err(ModelError::InputValidationError)` if the learning rate is not positive or not finite
pub(super) fn validate_learning_rate(learning_rate: f32) -> Result<(), ModelError> {
    if !(learning_rate > 0.0 && learning_rate.is_finite()) {
        return Err(ModelError::InputValidationError(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }
    Ok(())
}

/// Validates that a decay rate (beta) is in the range [0, 1) and finite.
///
/// # Parameters
///
/// - `value` - The decay rate value to validate
/// - `param_name` - The name of the parameter (for error messages)
///
/// # Returns
///
/// - `Ok(())` if the value is in the valid range and finite
/// - `Err(ModelError::InputValidationError)` if the value is out of range or not finite
pub(super) fn validate_decay_rate(value: f32, param_name: &str) -> Result<(), ModelError> {
    if !((0.0..1.0).contains(&value) && value.is_finite()) {
        return Err(ModelError::InputValidationError(format!(
            "{} must be in range [0, 1) and finite, got {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Validates that epsilon is positive and finite.
///
/// # Parameters
///
/// - `epsilon` - The epsilon value to validate
///
/// # Returns
///
/// - `Ok(())` if epsilon is positive and finite
/// - `Err(ModelError::InputValidationError)` if epsilon is not positive or not finite
pub(super) fn validate_epsilon(epsilon: f32) -> Result<(), ModelError> {
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(ModelError::InputValidationError(format!(
            "epsilon must be positive and finite, got {}",
            epsilon
        )));
    }
    Ok(())
}

/// Validates that gradients and parameters pair up one to one with equal shapes.
///
/// # Parameters
///
/// - `gradients` - One gradient per parameter
/// - `params` - Parameters the gradients belong to
///
/// # Returns
///
/// - `Ok(())` if every gradient matches its parameter
/// - `Err(ModelError::InputValidationError)` if the counts differ
/// - `Err(ModelError::ShapeMismatch)` if a gradient has the wrong shape
pub(super) fn validate_gradients(
    gradients: &[Array2<f32>],
    params: &[&mut Array2<f32>],
) -> Result<(), ModelError> {
    if gradients.len() != params.len() {
        return Err(ModelError::InputValidationError(format!(
            "got {} gradients for {} parameters",
            gradients.len(),
            params.len()
        )));
    }

    for (index, (grad, param)) in gradients.iter().zip(params.iter()).enumerate() {
        if grad.shape() != param.shape() {
            return Err(ModelError::shape_mismatch(
                &format!("gradient of parameter {}", index),
                param.shape(),
                grad.shape(),
            ));
        }
    }
    Ok(())
}
