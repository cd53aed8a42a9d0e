// Runs the fixed sample batch through the two-layer demo network and prints
// each layer's output.
use std::process::ExitCode;

use spiral_nn::demo::{sample_input, sample_network};
use spiral_nn::init_logging;
use tracing::{error, info};

fn run() -> spiral_nn::Result<()> {
    let input = sample_input()?;
    let network = sample_network()?;
    for (i, layer) in network.layers().iter().enumerate() {
        info!(layer = i + 1, inputs = layer.input_size(), neurons = layer.output_size(), "demo layer");
    }
    let outputs = network.forward_trace(&input)?;

    for (i, output) in outputs.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{output}");
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("forward demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
