pub mod spiral;

pub use spiral::{generate, Dataset, Point, SpiralConfig};
