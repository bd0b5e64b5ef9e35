use super::*;

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::InputValidationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Validates input dimensions for recurrent layers
///
/// # Parameters
///
/// - `input_dim` - The input dimension to validate
/// - `hidden_dim` - The hidden dimension to validate
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_recurrent_dimensions(
    input_dim: usize,
    hidden_dim: usize,
) -> Result<(), ModelError> {
    validate_dimension_greater_than_zero(input_dim, "input_dim")?;
    validate_dimension_greater_than_zero(hidden_dim, "hidden_dim")?;
    Ok(())
}

fn validate_shape(
    context: &str,
    array: &Array2<f32>,
    expected: (usize, usize),
) -> Result<(), ModelError> {
    if array.dim() != expected {
        return Err(ModelError::shape_mismatch(
            context,
            &[expected.0, expected.1],
            array.shape(),
        ));
    }
    Ok(())
}

/// Validates the operands of a single LSTM step
///
/// `h_prev` fixes the batch size; `input_t` must be `(batch, input_dim)` and
/// `c_prev` must be `(batch, hidden_dim)` like `h_prev`.
pub(super) fn validate_step(
    input_t: &Array2<f32>,
    h_prev: &Array2<f32>,
    c_prev: &Array2<f32>,
    params: &LSTMParameters,
) -> Result<(), ModelError> {
    let batch = h_prev.nrows();
    validate_dimension_greater_than_zero(batch, "batch")?;
    validate_shape("hidden state", h_prev, (batch, params.hidden_dim()))?;
    validate_shape("cell state", c_prev, (batch, params.hidden_dim()))?;
    validate_shape("input", input_t, (batch, params.input_dim()))?;
    Ok(())
}

/// Validates a whole input sequence and its initial state before anything is computed
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If `inputs` is empty or the batch has no rows
/// - `ModelError::ShapeMismatch` - If any input or the initial state has the wrong shape
pub(crate) fn validate_sequence(
    inputs: &[Array2<f32>],
    h0: &Array2<f32>,
    c0: &Array2<f32>,
    params: &LSTMParameters,
) -> Result<(), ModelError> {
    if inputs.is_empty() {
        return Err(ModelError::InputValidationError(
            "input sequence must contain at least one time step".to_string(),
        ));
    }

    let batch = h0.nrows();
    validate_dimension_greater_than_zero(batch, "batch")?;
    validate_shape("initial hidden state", h0, (batch, params.hidden_dim()))?;
    validate_shape("initial cell state", c0, (batch, params.hidden_dim()))?;

    for (t, input_t) in inputs.iter().enumerate() {
        validate_shape(
            &format!("input at step {}", t),
            input_t,
            (batch, params.input_dim()),
        )?;
    }
    Ok(())
}

/// Validates a target sequence against the sequence length and state shape
///
/// With `every_step` the targets must match the inputs one to one, otherwise at
/// least one target is required and only the last is used.
pub(crate) fn validate_targets(
    targets: &[Array2<f32>],
    sequence_length: usize,
    batch: usize,
    hidden_dim: usize,
    every_step: bool,
) -> Result<(), ModelError> {
    if targets.is_empty() {
        return Err(ModelError::InputValidationError(
            "target sequence must contain at least one entry".to_string(),
        ));
    }
    if every_step && targets.len() != sequence_length {
        return Err(ModelError::InputValidationError(format!(
            "every-step supervision needs {} targets, got {}",
            sequence_length,
            targets.len()
        )));
    }

    for (t, target) in targets.iter().enumerate() {
        validate_shape(&format!("target at step {}", t), target, (batch, hidden_dim))?;
    }
    Ok(())
}
