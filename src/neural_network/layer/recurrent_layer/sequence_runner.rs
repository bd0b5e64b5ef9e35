use super::*;

/// Hidden and cell states produced by one unroll, one entry per time step.
///
/// The state at index `t` is the output of step `t`; the initial state is not
/// included.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    hidden: Vec<Array2<f32>>,
    cell: Vec<Array2<f32>>,
}

impl Trajectory {
    /// Number of time steps
    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    /// Returns `true` if the trajectory holds no steps
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }

    /// Hidden states, in time order
    pub fn hidden_states(&self) -> &[Array2<f32>] {
        &self.hidden
    }

    /// Cell states, in time order
    pub fn cell_states(&self) -> &[Array2<f32>] {
        &self.cell
    }

    /// Hidden state after the last step
    pub fn final_hidden(&self) -> Option<&Array2<f32>> {
        self.hidden.last()
    }

    /// `(hidden, cell)` after the last step
    pub fn final_state(&self) -> Option<(&Array2<f32>, &Array2<f32>)> {
        self.hidden.last().zip(self.cell.last())
    }

    /// Splits the trajectory into its hidden and cell sequences
    pub fn into_parts(self) -> (Vec<Array2<f32>>, Vec<Array2<f32>>) {
        (self.hidden, self.cell)
    }
}

/// Tape handles of the states produced by [`unroll_on_tape`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TapeTrajectory {
    pub hidden: Vec<Var>,
    pub cell: Vec<Var>,
}

/// Builds the zero-initialized `(hidden, cell)` state pair
pub fn zero_state(batch: usize, hidden_dim: usize) -> (Array2<f32>, Array2<f32>) {
    (
        Array2::zeros((batch, hidden_dim)),
        Array2::zeros((batch, hidden_dim)),
    )
}

/// Unrolls the LSTM cell over `inputs`, starting from `(h0, c0)`.
///
/// Steps run strictly in order, each consuming the state of the previous one.
/// All shapes are checked before the first step, so an ill-shaped element
/// anywhere in the sequence fails the call without computing anything.
/// The same arguments always produce the same trajectory.
///
/// # Parameters
///
/// - `inputs` - Input sequence, each element (batch, input_dim)
/// - `h0` - Initial hidden state with shape (batch, hidden_dim)
/// - `c0` - Initial cell state with shape (batch, hidden_dim)
/// - `params` - LSTM parameters
///
/// # Returns
///
/// - `Ok(Trajectory)` - One hidden and one cell state per input element
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If `inputs` is empty or the batch has no rows
/// - `ModelError::ShapeMismatch` - If an input or the initial state does not fit `params`
///
/// # Example
/// ```rust
/// use rustylstm::neural_network::{LSTMParameters, unroll, zero_state};
/// use ndarray::Array2;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let params = LSTMParameters::with_rng(3, 4, &mut rng).unwrap();
/// let inputs = vec![Array2::ones((2, 3)); 5];
/// let (h0, c0) = zero_state(2, 4);
///
/// let trajectory = unroll(&inputs, &h0, &c0, &params).unwrap();
/// assert_eq!(trajectory.len(), 5);
/// assert_eq!(trajectory.final_hidden().unwrap().shape(), &[2, 4]);
/// ```
pub fn unroll(
    inputs: &[Array2<f32>],
    h0: &Array2<f32>,
    c0: &Array2<f32>,
    params: &LSTMParameters,
) -> Result<Trajectory, ModelError> {
    validate_sequence(inputs, h0, c0, params)?;

    let mut tape = Tape::new();
    let vars = params.record(&mut tape);
    let h = tape.leaf(h0.clone());
    let c = tape.leaf(c0.clone());
    let recorded = unroll_on_tape(&mut tape, inputs, h, c, &vars)?;

    Ok(Trajectory {
        hidden: recorded
            .hidden
            .iter()
            .map(|&var| tape.value(var).clone())
            .collect(),
        cell: recorded
            .cell
            .iter()
            .map(|&var| tape.value(var).clone())
            .collect(),
    })
}

/// Records the unroll of `inputs` on `tape`, starting from the recorded state `(h0, c0)`.
///
/// Each input is added to the tape as a leaf. Shapes are checked by the tape
/// operations as they are recorded.
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If any operand has an incompatible shape
pub fn unroll_on_tape(
    tape: &mut Tape,
    inputs: &[Array2<f32>],
    h0: Var,
    c0: Var,
    params: &LSTMParameterVars,
) -> Result<TapeTrajectory, ModelError> {
    let mut recorded = TapeTrajectory {
        hidden: Vec::with_capacity(inputs.len()),
        cell: Vec::with_capacity(inputs.len()),
    };

    let (mut h, mut c) = (h0, c0);
    for input_t in inputs {
        let x = tape.leaf(input_t.clone());
        (h, c) = step_on_tape(tape, x, h, c, params)?;
        recorded.hidden.push(h);
        recorded.cell.push(c);
    }

    Ok(recorded)
}
