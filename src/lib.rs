//! A single-layer LSTM cell in pure Rust.
//!
//! The crate covers the cell's gate equations, its unrolled evaluation over a
//! time sequence, and a training loop that fits the cell's parameters to
//! targets with a reverse-mode gradient tape and Adam.

/// Module `autodiff` contains the reverse-mode gradient tape used for training.
///
/// Operations on `Array2<f32>` values are recorded eagerly; the tape can then
/// return the gradient of a scalar with respect to any recorded leaf.
///
/// # Example
/// ```rust
/// use rustylstm::autodiff::Tape;
/// use ndarray::array;
///
/// let mut tape = Tape::new();
/// let x = tape.leaf(array![[1.0, 2.0]]);
/// let w = tape.leaf(array![[0.5], [0.25]]);
/// let y = tape.matmul(x, w).unwrap();
/// let loss = tape.mean(y).unwrap();
///
/// let grads = tape.gradients(loss, &[w]).unwrap();
/// assert_eq!(grads[0], array![[1.0], [2.0]]);
/// ```
pub mod autodiff;

/// Module `dataset` builds random example sequences for training demos and tests.
pub mod dataset;

/// Error types shared by every module of the crate
pub mod error;

/// Module `math` contains scalar activations and matrix loss helpers.
///
/// # Core Functions
///
/// - `sigmoid` - Logistic sigmoid with input clipping
/// - `tanh` - Hyperbolic tangent with input clipping
/// - `mean_squared_error` - Mean of squared element-wise differences
pub mod math;

/// Module `neural_network` provides the LSTM cell and everything needed to train it.
///
/// # Core Components
///
/// - **Parameters**: `LSTMParameters`, four gates with a weight matrix and bias row each
/// - **Gate Block**: `step`, one time step of the recurrence
/// - **Sequence Runner**: `unroll`, the step applied across a sequence
/// - **Trainer**: `Trainer` and `train`, the epoch loop with loss reporting
/// - **Optimizers**: `Adam`, `SGD`
/// - **Loss Functions**: `MeanSquaredError`
///
/// # Examples
/// ```rust
/// use rustylstm::neural_network::*;
/// use rustylstm::dataset::{SequenceConfig, synthetic_sequence};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let data = synthetic_sequence(&SequenceConfig::default(), &mut rng).unwrap();
/// let mut params = LSTMParameters::with_rng(3, 4, &mut rng).unwrap();
/// let (h0, c0) = zero_state(1, 4);
///
/// // Train for 20 epochs with Adam
/// let history = train(&data.inputs, &data.targets, &h0, &c0, &mut params, 0.001, 20).unwrap();
/// assert_eq!(history.reports().len(), 2);
///
/// // Run the trained cell
/// let trajectory = unroll(&data.inputs, &h0, &c0, &params).unwrap();
/// assert_eq!(trajectory.len(), 5);
/// ```
pub mod neural_network;

/// Convenience re-exports of the commonly used types and functions
pub mod prelude;

/// Traits at the seams between the recurrence and its collaborators
pub mod traits;

pub use error::ModelError;
