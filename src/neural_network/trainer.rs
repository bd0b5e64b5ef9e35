use crate::autodiff::{Tape, Var};
use crate::error::ModelError;
use crate::neural_network::layer::recurrent_layer::{
    LSTMParameterVars, LSTMParameters, unroll_on_tape, validate_sequence, validate_targets,
};
use crate::neural_network::loss_function::MeanSquaredError;
use crate::neural_network::optimizer::Adam;
use crate::traits::{LossFunction, Optimizer};
use ndarray::Array2;
use tracing::{debug, info, warn};

/// Epochs between two loss reports unless configured otherwise.
const DEFAULT_REPORT_INTERVAL: usize = 10;

/// Which time steps the loss compares against targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Supervision {
    /// Only the final hidden state is compared with the last target
    #[default]
    FinalStep,
    /// Every hidden state is compared with the target of its step and the per-step losses are averaged
    EveryStep,
}

/// Loss reported after an epoch's update has been applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// 0-based epoch index
    pub epoch: usize,
    /// Number of epochs in the run
    pub total_epochs: usize,
    /// Loss recomputed with the updated parameters
    pub loss: f32,
}

/// Losses collected during one call to [`Trainer::train`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    epoch_losses: Vec<f32>,
    reports: Vec<EpochReport>,
}

impl TrainingHistory {
    /// Training loss of every epoch, measured before that epoch's update
    pub fn epoch_losses(&self) -> &[f32] {
        &self.epoch_losses
    }

    /// Periodic reports, in epoch order
    pub fn reports(&self) -> &[EpochReport] {
        &self.reports
    }

    /// Loss of the last periodic report, if any report was emitted.
    ///
    /// This is not necessarily the loss after the final epoch; use
    /// [`Self::epoch_losses`] for a per-epoch view.
    pub fn last_reported_loss(&self) -> Option<f32> {
        self.reports.last().map(|report| report.loss)
    }

    /// Number of epochs that ran
    pub fn len(&self) -> usize {
        self.epoch_losses.len()
    }

    /// Returns `true` if no epoch ran
    pub fn is_empty(&self) -> bool {
        self.epoch_losses.is_empty()
    }
}

/// Fits [`LSTMParameters`] to targets by repeated forward unroll, tape
/// differentiation and optimizer steps.
///
/// One epoch records the whole unroll and the loss on a fresh tape, asks the
/// tape for the gradient of every parameter tensor and hands them to the
/// optimizer. Every `report_interval` epochs the loss is recomputed with the
/// updated parameters and logged as `Epoch {k}/{epochs}, Loss: {v}`.
///
/// # Example
/// ```rust
/// use rustylstm::neural_network::{LSTMParameters, Trainer, zero_state};
/// use ndarray::Array2;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut params = LSTMParameters::with_rng(2, 3, &mut rng).unwrap();
/// let inputs = vec![Array2::from_elem((1, 2), 0.5); 4];
/// let targets = vec![Array2::from_elem((1, 3), 0.25)];
/// let (h0, c0) = zero_state(1, 3);
///
/// let mut trainer = Trainer::adam(0.01, 50).unwrap();
/// let history = trainer.train(&inputs, &targets, &h0, &c0, &mut params).unwrap();
///
/// assert_eq!(history.len(), 50);
/// assert_eq!(history.reports().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct Trainer<O, L = MeanSquaredError> {
    optimizer: O,
    loss_fn: L,
    epochs: usize,
    report_interval: usize,
    supervision: Supervision,
    gradient_clip: Option<f32>,
}

impl Trainer<Adam, MeanSquaredError> {
    /// Trainer with a default Adam optimizer and mean squared error loss
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `learning_rate` is not positive and finite
    pub fn adam(learning_rate: f32, epochs: usize) -> Result<Self, ModelError> {
        Ok(Self::new(
            Adam::with_learning_rate(learning_rate)?,
            MeanSquaredError::new(),
            epochs,
        ))
    }
}

impl<O: Optimizer, L: LossFunction> Trainer<O, L> {
    /// Creates a trainer with final-step supervision, no clipping and a report every 10 epochs
    pub fn new(optimizer: O, loss_fn: L, epochs: usize) -> Self {
        Self {
            optimizer,
            loss_fn,
            epochs,
            report_interval: DEFAULT_REPORT_INTERVAL,
            supervision: Supervision::default(),
            gradient_clip: None,
        }
    }

    /// Sets how many epochs pass between two loss reports. Must be at least 1.
    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval;
        self
    }

    /// Selects which time steps are supervised
    pub fn with_supervision(mut self, supervision: Supervision) -> Self {
        self.supervision = supervision;
        self
    }

    /// Clamps every gradient element to `[-clip, clip]` before the optimizer step.
    /// Must be positive and finite.
    pub fn with_gradient_clip(mut self, clip: f32) -> Self {
        self.gradient_clip = Some(clip);
        self
    }

    /// The optimizer, including any state accumulated by previous runs
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Number of epochs one call to [`Self::train`] runs
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Supervision mode in use
    pub fn supervision(&self) -> Supervision {
        self.supervision
    }

    /// Trains `params` in place for the configured number of epochs.
    ///
    /// Every shape is validated before the first epoch, so an inconsistent input
    /// leaves `params` untouched. Epochs run strictly one after the other; each
    /// sees the parameters written by the previous one.
    ///
    /// # Parameters
    ///
    /// - `inputs` - Input sequence, each element (batch, input_dim)
    /// - `targets` - Target sequence, each element (batch, hidden_dim). With final-step
    ///   supervision only the last element is used
    /// - `h0` - Initial hidden state with shape (batch, hidden_dim)
    /// - `c0` - Initial cell state with shape (batch, hidden_dim)
    /// - `params` - Parameters to train
    ///
    /// # Returns
    ///
    /// - `Ok(TrainingHistory)` - Per-epoch losses and the periodic reports
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the configuration or the sequence lengths are invalid
    /// - `ModelError::ShapeMismatch` - If any tensor does not fit `params`
    /// - `ModelError::NonFiniteLoss` - If the loss becomes NaN or infinite; that epoch's update is not applied
    /// - `ModelError::NonFiniteGradient` - If any parameter gradient becomes NaN or infinite; that epoch's update is not applied
    pub fn train(
        &mut self,
        inputs: &[Array2<f32>],
        targets: &[Array2<f32>],
        h0: &Array2<f32>,
        c0: &Array2<f32>,
        params: &mut LSTMParameters,
    ) -> Result<TrainingHistory, ModelError> {
        self.validate_config()?;
        self.validate_data(inputs, targets, h0, c0, params)?;

        info!(
            epochs = self.epochs,
            learning_rate = self.optimizer.learning_rate(),
            sequence_length = inputs.len(),
            param_count = params.param_count(),
            "starting LSTM training"
        );

        let mut history = TrainingHistory {
            epoch_losses: Vec::with_capacity(self.epochs),
            reports: Vec::with_capacity(self.epochs / self.report_interval + 1),
        };
        let mut tape = Tape::new();

        for epoch in 0..self.epochs {
            tape.clear();
            let (loss, vars) = self.record_loss(&mut tape, inputs, targets, h0, c0, params)?;
            let loss_value = tape.scalar(loss)?;
            if !loss_value.is_finite() {
                warn!(epoch, loss = loss_value, "training loss is not finite");
                return Err(ModelError::NonFiniteLoss {
                    epoch,
                    loss: loss_value,
                });
            }

            let mut gradients = tape.gradients(loss, &vars.leaves())?;
            if let Some(parameter) = gradients
                .iter()
                .position(|grad| grad.iter().any(|g| !g.is_finite()))
            {
                warn!(epoch, parameter, "parameter gradient is not finite");
                return Err(ModelError::NonFiniteGradient { epoch, parameter });
            }
            if let Some(clip) = self.gradient_clip {
                for grad in &mut gradients {
                    grad.mapv_inplace(|x| x.clamp(-clip, clip));
                }
            }
            self.optimizer.apply(&gradients, &mut params.tensors_mut())?;

            debug!(epoch, loss = loss_value, "epoch finished");
            history.epoch_losses.push(loss_value);

            if epoch % self.report_interval == 0 {
                tape.clear();
                let (loss, _) = self.record_loss(&mut tape, inputs, targets, h0, c0, params)?;
                let loss = tape.scalar(loss)?;
                info!("Epoch {}/{}, Loss: {}", epoch, self.epochs, loss);
                history.reports.push(EpochReport {
                    epoch,
                    total_epochs: self.epochs,
                    loss,
                });
            }
        }

        Ok(history)
    }

    /// Computes the loss of `params` on the given data without modifying anything.
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the sequence lengths are invalid
    /// - `ModelError::ShapeMismatch` - If any tensor does not fit `params`
    pub fn evaluate(
        &self,
        inputs: &[Array2<f32>],
        targets: &[Array2<f32>],
        h0: &Array2<f32>,
        c0: &Array2<f32>,
        params: &LSTMParameters,
    ) -> Result<f32, ModelError> {
        self.validate_data(inputs, targets, h0, c0, params)?;

        let mut tape = Tape::new();
        let (loss, _) = self.record_loss(&mut tape, inputs, targets, h0, c0, params)?;
        tape.scalar(loss)
    }

    fn validate_config(&self) -> Result<(), ModelError> {
        if self.report_interval == 0 {
            return Err(ModelError::InputValidationError(
                "report_interval must be greater than 0".to_string(),
            ));
        }
        if let Some(clip) = self.gradient_clip {
            if !(clip > 0.0 && clip.is_finite()) {
                return Err(ModelError::InputValidationError(format!(
                    "gradient clip must be positive and finite, got {}",
                    clip
                )));
            }
        }
        Ok(())
    }

    fn validate_data(
        &self,
        inputs: &[Array2<f32>],
        targets: &[Array2<f32>],
        h0: &Array2<f32>,
        c0: &Array2<f32>,
        params: &LSTMParameters,
    ) -> Result<(), ModelError> {
        validate_sequence(inputs, h0, c0, params)?;
        validate_targets(
            targets,
            inputs.len(),
            h0.nrows(),
            params.hidden_dim(),
            self.supervision == Supervision::EveryStep,
        )
    }

    /// Records parameters, unroll and loss on `tape`
    fn record_loss(
        &self,
        tape: &mut Tape,
        inputs: &[Array2<f32>],
        targets: &[Array2<f32>],
        h0: &Array2<f32>,
        c0: &Array2<f32>,
        params: &LSTMParameters,
    ) -> Result<(Var, LSTMParameterVars), ModelError> {
        let vars = params.record(tape);
        let h = tape.leaf(h0.clone());
        let c = tape.leaf(c0.clone());
        let trajectory = unroll_on_tape(tape, inputs, h, c, &vars)?;

        let loss = match self.supervision {
            Supervision::FinalStep => {
                let (Some(&prediction), Some(target)) = (trajectory.hidden.last(), targets.last())
                else {
                    return Err(ModelError::InputValidationError(
                        "final-step supervision needs at least one step and one target".to_string(),
                    ));
                };
                let target = tape.leaf(target.clone());
                self.loss_fn.record(tape, target, prediction)?
            }
            Supervision::EveryStep => {
                let mut total: Option<Var> = None;
                for (&prediction, target) in trajectory.hidden.iter().zip(targets) {
                    let target = tape.leaf(target.clone());
                    let step_loss = self.loss_fn.record(tape, target, prediction)?;
                    total = Some(match total {
                        Some(sum) => tape.add(sum, step_loss)?,
                        None => step_loss,
                    });
                }
                let total = total.ok_or_else(|| {
                    ModelError::InputValidationError(
                        "every-step supervision needs at least one step".to_string(),
                    )
                })?;
                tape.scale(total, 1.0 / trajectory.hidden.len() as f32)
            }
        };

        Ok((loss, vars))
    }
}

/// Trains `params` with Adam and mean squared error on the final hidden state.
///
/// Equivalent to `Trainer::adam(learning_rate, epochs)?.train(..)`.
///
/// # Errors
///
/// See [`Trainer::train`]; additionally `ModelError::InputValidationError` for an invalid `learning_rate`.
pub fn train(
    inputs: &[Array2<f32>],
    targets: &[Array2<f32>],
    h0: &Array2<f32>,
    c0: &Array2<f32>,
    params: &mut LSTMParameters,
    learning_rate: f32,
    epochs: usize,
) -> Result<TrainingHistory, ModelError> {
    Trainer::adam(learning_rate, epochs)?.train(inputs, targets, h0, c0, params)
}
