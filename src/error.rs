use thiserror::Error;

/// Error types that can occur while building, running or training an LSTM cell
///
/// # Variants
///
/// - `InputValidationError` - indicates the input data or a hyper-parameter does not meet the expected format or range
/// - `ShapeMismatch` - indicates two tensors with incompatible dimensions met in a concatenation, product or element-wise operation
/// - `UnusedParameterGradient` - indicates a gradient was requested for a parameter that never took part in the loss computation
/// - `NonFiniteLoss` - indicates the training loss became NaN or infinite
/// - `NonFiniteGradient` - indicates a parameter gradient became NaN or infinite while the loss was still finite
/// - `ProcessingError` - indicates that there is something wrong while processing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Input validation error: {0}")]
    InputValidationError(String),

    #[error("Shape mismatch in {context}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Parameter {0} did not take part in the loss computation")]
    UnusedParameterGradient(String),

    #[error("Loss became non-finite ({loss}) at epoch {epoch}")]
    NonFiniteLoss { epoch: usize, loss: f32 },

    #[error("Gradient of parameter {parameter} became non-finite at epoch {epoch}")]
    NonFiniteGradient { epoch: usize, parameter: usize },

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

impl ModelError {
    /// Builds a `ShapeMismatch` from two shape slices
    pub(crate) fn shape_mismatch(context: &str, expected: &[usize], got: &[usize]) -> Self {
        ModelError::ShapeMismatch {
            context: context.to_string(),
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}
