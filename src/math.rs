use ndarray::{ArrayBase, Data, Ix2};

/// Sigmoid arguments are clamped to this magnitude before exponentiation.
const MAX_ACTIVATION_INPUT: f32 = 500.0;

/// Computes the logistic sigmoid for a scalar input.
///
/// The sigmoid maps any real number into the open interval (0, 1). The input is
/// clipped to `[-500, 500]` first so `exp` never overflows.
///
/// # Parameters
///
/// - `z` - Input value to transform
///
/// # Returns
///
/// - `f32` - Sigmoid output in the range (0, 1)
///
/// # Examples
/// ```rust
/// use rustylstm::math::sigmoid;
///
/// let value = sigmoid(0.0);
/// // sigmoid(0) = 0.5
/// assert!((value - 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn sigmoid(z: f32) -> f32 {
    let clipped = z.clamp(-MAX_ACTIVATION_INPUT, MAX_ACTIVATION_INPUT);
    1.0 / (1.0 + (-clipped).exp())
}

/// Hyperbolic tangent with the same input clipping as [`sigmoid`].
///
/// # Examples
/// ```rust
/// use rustylstm::math::tanh;
///
/// assert_eq!(tanh(0.0), 0.0);
/// assert!(tanh(1e6) <= 1.0);
/// ```
#[inline]
pub fn tanh(z: f32) -> f32 {
    z.clamp(-MAX_ACTIVATION_INPUT, MAX_ACTIVATION_INPUT).tanh()
}

/// Calculates the mean of the squared element-wise differences of two matrices.
///
/// # Parameters
///
/// - `y_true` - Ground truth values
/// - `y_pred` - Predicted values, same shape as `y_true`
///
/// # Returns
///
/// - `Some(f32)` - The mean squared error
/// - `None` - If the shapes differ or the matrices are empty
///
/// # Examples
/// ```rust
/// use rustylstm::math::mean_squared_error;
/// use ndarray::array;
///
/// let y_true = array![[1.0, 2.0], [3.0, 4.0]];
/// let y_pred = array![[1.0, 2.0], [3.0, 6.0]];
/// // Only the last element differs, by 2: 4 / 4 = 1
/// assert_eq!(mean_squared_error(&y_true, &y_pred), Some(1.0));
/// ```
pub fn mean_squared_error<S1, S2>(
    y_true: &ArrayBase<S1, Ix2>,
    y_pred: &ArrayBase<S2, Ix2>,
) -> Option<f32>
where
    S1: Data<Elem = f32>,
    S2: Data<Elem = f32>,
{
    if y_true.shape() != y_pred.shape() || y_true.is_empty() {
        return None;
    }

    let sum = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum::<f32>();

    Some(sum / y_true.len() as f32)
}
