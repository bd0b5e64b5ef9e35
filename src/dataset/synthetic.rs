use crate::error::ModelError;
use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;

/// Dimensions of a generated sequence
///
/// # Fields
///
/// - `input_dim` - Features per time step
/// - `output_dim` - Features per target, equal to the hidden dimension of the cell it trains
/// - `sequence_length` - Number of time steps
/// - `batch` - Rows of every tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceConfig {
    pub input_dim: usize,
    pub output_dim: usize,
    pub sequence_length: usize,
    pub batch: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            input_dim: 3,
            output_dim: 4,
            sequence_length: 5,
            batch: 1,
        }
    }
}

/// An input sequence paired with a target sequence of the same length
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDataset {
    pub inputs: Vec<Array2<f32>>,
    pub targets: Vec<Array2<f32>>,
}

/// Generates a sequence whose inputs and targets are drawn from N(0, 1).
///
/// Inputs are (batch, input_dim) and targets are (batch, output_dim), one of each
/// per time step. All inputs are drawn before the targets, so a seeded `rng`
/// always yields the same dataset.
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If any dimension in `config` is 0
///
/// # Example
/// ```
/// use rustylstm::dataset::{SequenceConfig, synthetic_sequence};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let data = synthetic_sequence(&SequenceConfig::default(), &mut rng).unwrap();
/// assert_eq!(data.inputs.len(), 5);
/// assert_eq!(data.inputs[0].shape(), &[1, 3]);
/// assert_eq!(data.targets[0].shape(), &[1, 4]);
/// ```
pub fn synthetic_sequence<R: Rng + ?Sized>(
    config: &SequenceConfig,
    rng: &mut R,
) -> Result<SequenceDataset, ModelError> {
    for (value, name) in [
        (config.input_dim, "input_dim"),
        (config.output_dim, "output_dim"),
        (config.sequence_length, "sequence_length"),
        (config.batch, "batch"),
    ] {
        if value == 0 {
            return Err(ModelError::InputValidationError(format!(
                "{} must be greater than 0",
                name
            )));
        }
    }

    let mut draw = |cols: usize| {
        Array2::from_shape_simple_fn((config.batch, cols), || {
            rng.sample::<f32, _>(StandardNormal)
        })
    };

    let inputs = (0..config.sequence_length)
        .map(|_| draw(config.input_dim))
        .collect();
    let targets = (0..config.sequence_length)
        .map(|_| draw(config.output_dim))
        .collect();

    Ok(SequenceDataset { inputs, targets })
}
