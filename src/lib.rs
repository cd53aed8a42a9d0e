pub mod error;
pub mod math;
pub mod layers;
pub mod network;
pub mod data;
pub mod plot;
pub mod demo;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use layers::dense::{forward, Layer};
pub use network::network::Network;
pub use data::spiral::{generate, Dataset, Point, SpiralConfig};
pub use plot::{render_scatter, save_scatter, PlotConfig};

/// Installs the `tracing` subscriber used by the binaries: human-readable
/// output on stderr, filtered by `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
