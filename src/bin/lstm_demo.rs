use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustylstm::dataset::{SequenceConfig, synthetic_sequence};
use rustylstm::neural_network::{LSTMParameters, Trainer, zero_state};
use tracing::info;

#[derive(Parser)]
#[command(name = "lstm_demo", version, about = "Train a single LSTM cell on a random sequence")]
struct Cli {
    /// Features per time step.
    #[arg(long, default_value_t = 3)]
    input_dim: usize,

    /// Hidden units, also the width of every target.
    #[arg(long, default_value_t = 4)]
    hidden_dim: usize,

    /// Number of time steps.
    #[arg(long, default_value_t = 5)]
    sequence_length: usize,

    /// Rows per tensor.
    #[arg(long, default_value_t = 1)]
    batch: usize,

    /// Number of training epochs.
    #[arg(long, default_value_t = 300)]
    epochs: usize,

    /// Adam learning rate.
    #[arg(long, default_value_t = 0.001)]
    learning_rate: f32,

    /// Epochs between two loss reports.
    #[arg(long, default_value_t = 10)]
    report_interval: usize,

    /// Seed for the example data and the initial weights.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let config = SequenceConfig {
        input_dim: cli.input_dim,
        output_dim: cli.hidden_dim,
        sequence_length: cli.sequence_length,
        batch: cli.batch,
    };
    let data = synthetic_sequence(&config, &mut rng)?;
    let mut params = LSTMParameters::with_rng(cli.input_dim, cli.hidden_dim, &mut rng)?;
    let (h0, c0) = zero_state(cli.batch, cli.hidden_dim);

    let mut trainer =
        Trainer::adam(cli.learning_rate, cli.epochs)?.with_report_interval(cli.report_interval);
    let history = trainer.train(&data.inputs, &data.targets, &h0, &c0, &mut params)?;

    if let (Some(first), Some(last)) = (history.epoch_losses().first(), history.epoch_losses().last()) {
        info!(initial_loss = first, final_loss = last, "training finished");
    }
    Ok(())
}
