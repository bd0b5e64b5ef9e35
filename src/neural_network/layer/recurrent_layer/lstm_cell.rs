use super::gate::compute_gate_value;
use super::input_validation_function::validate_step;
use super::*;

/// Computes one LSTM time step.
///
/// `input_t` and `h_prev` are concatenated along the feature axis; the input,
/// forget and output gates apply a sigmoid to their projection, the cell update
/// applies tanh. The new cell state is `forget ⊙ c_prev + input ⊙ update` and
/// the new hidden state is `output ⊙ tanh(c_t)`.
///
/// Nothing passed in is modified.
///
/// # Parameters
///
/// - `input_t` - Input at this time step with shape (batch, input_dim)
/// - `h_prev` - Previous hidden state with shape (batch, hidden_dim)
/// - `c_prev` - Previous cell state with shape (batch, hidden_dim)
/// - `params` - LSTM parameters
///
/// # Returns
///
/// - `Ok((h_t, c_t))` - New hidden and cell state, each (batch, hidden_dim)
///
/// # Errors
///
/// - `ModelError::InputValidationError` - If the batch has no rows
/// - `ModelError::ShapeMismatch` - If the batch sizes or feature widths disagree with `params`
///
/// # Example
/// ```rust
/// use rustylstm::neural_network::{LSTMParameters, step, zero_state};
/// use ndarray::array;
///
/// let params = LSTMParameters::zeros(2, 3).unwrap();
/// let (h0, c0) = zero_state(1, 3);
/// let (h1, c1) = step(&array![[0.5, -1.0]], &h0, &c0, &params).unwrap();
///
/// // zero weights: every gate is 0.5 and the update is 0, so the state stays at zero
/// assert!(h1.iter().all(|&v| v == 0.0));
/// assert!(c1.iter().all(|&v| v == 0.0));
/// ```
pub fn step(
    input_t: &Array2<f32>,
    h_prev: &Array2<f32>,
    c_prev: &Array2<f32>,
    params: &LSTMParameters,
) -> Result<(Array2<f32>, Array2<f32>), ModelError> {
    validate_step(input_t, h_prev, c_prev, params)?;

    let mut tape = Tape::new();
    let vars = params.record(&mut tape);
    let x = tape.leaf(input_t.clone());
    let h = tape.leaf(h_prev.clone());
    let c = tape.leaf(c_prev.clone());

    let (h_t, c_t) = step_on_tape(&mut tape, x, h, c, &vars)?;
    Ok((tape.value(h_t).clone(), tape.value(c_t).clone()))
}

/// Records one LSTM time step on `tape`.
///
/// This is the same computation as [`step`], expressed on tape variables so the
/// gradient of anything derived from `h_t` or `c_t` reaches the parameters.
///
/// # Returns
///
/// - `Ok((h_t, c_t))` - Handles of the new hidden and cell state
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If any operand has an incompatible shape
pub fn step_on_tape(
    tape: &mut Tape,
    input_t: Var,
    h_prev: Var,
    c_prev: Var,
    params: &LSTMParameterVars,
) -> Result<(Var, Var), ModelError> {
    let x = tape.concat_columns(input_t, h_prev)?;

    let input_gate = compute_gate_value(tape, x, params.input)?;
    let input_gate = tape.sigmoid(input_gate);
    let forget_gate = compute_gate_value(tape, x, params.forget)?;
    let forget_gate = tape.sigmoid(forget_gate);
    let output_gate = compute_gate_value(tape, x, params.output)?;
    let output_gate = tape.sigmoid(output_gate);
    let update = compute_gate_value(tape, x, params.cell_update)?;
    let update = tape.tanh(update);

    // c_t = f_t * c_prev + i_t * u_t
    let retained = tape.mul(forget_gate, c_prev)?;
    let injected = tape.mul(input_gate, update)?;
    let c_t = tape.add(retained, injected)?;

    // h_t = o_t * tanh(c_t)
    let c_t_activated = tape.tanh(c_t);
    let h_t = tape.mul(output_gate, c_t_activated)?;

    Ok((h_t, c_t))
}
