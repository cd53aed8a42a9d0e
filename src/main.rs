// Generates the default three-arm spiral dataset and writes it to plots.png.
// The forward-pass demo lives in its own binary:
//   cargo run --bin forward-demo
use std::process::ExitCode;

use spiral_nn::{init_logging, save_scatter, PlotConfig, SpiralConfig};
use tracing::error;

fn run() -> spiral_nn::Result<()> {
    let dataset = SpiralConfig::default().generate()?;
    save_scatter(&dataset, &PlotConfig::default())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("spiral plot failed: {e}");
            ExitCode::FAILURE
        }
    }
}
