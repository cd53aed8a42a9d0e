use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Angle, in radians before scaling, that separates neighbouring arms and
/// that each arm sweeps from its centre to its tip.
pub const ARM_SWEEP: f64 = 4.0;

/// Multiplier applied to the angle before converting to Cartesian coordinates.
pub const ANGLE_SCALE: f64 = 2.5;

/// Standard deviation of the angular noise.
pub const DEFAULT_NOISE: f64 = 0.2;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Labeled points grouped by class: arm 0 occupies the first
/// `samples_per_class` entries, arm 1 the next block, and so on. Within an
/// arm the points are ordered by increasing radius.
///
/// Deserialized datasets are checked against the same layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    samples_per_class: usize,
    classes: usize,
    points: Vec<Point>,
    labels: Vec<usize>,
}

#[derive(Deserialize)]
struct RawDataset {
    samples_per_class: usize,
    classes: usize,
    points: Vec<Point>,
    labels: Vec<usize>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = NnError;

    fn try_from(raw: RawDataset) -> Result<Dataset> {
        let total = dataset_len(raw.samples_per_class, raw.classes)?;
        if raw.points.len() != total {
            return Err(NnError::DataLength { expected: total, found: raw.points.len() });
        }
        if raw.labels.len() != total {
            return Err(NnError::DataLength { expected: total, found: raw.labels.len() });
        }
        for (index, &found) in raw.labels.iter().enumerate() {
            let expected = index / raw.samples_per_class;
            if found != expected {
                return Err(NnError::Mislabeled { index, expected, found });
            }
        }
        Ok(Dataset {
            samples_per_class: raw.samples_per_class,
            classes: raw.classes,
            points: raw.points,
            labels: raw.labels,
        })
    }
}

/// Number of points in a dataset of `classes` arms with `samples` points each.
fn dataset_len(samples: usize, classes: usize) -> Result<usize> {
    if samples < 2 {
        return Err(NnError::InvalidSampleCount { samples });
    }
    samples
        .checked_mul(classes)
        .ok_or(NnError::DatasetTooLarge { samples, classes })
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn samples_per_class(&self) -> usize {
        self.samples_per_class
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, usize)> + '_ {
        self.points.iter().copied().zip(self.labels.iter().copied())
    }

    /// The contiguous block of points belonging to `class`, empty when the
    /// class does not exist.
    pub fn class_points(&self, class: usize) -> &[Point] {
        if class >= self.classes {
            return &[];
        }
        let start = class * self.samples_per_class;
        self.points.get(start..start + self.samples_per_class).unwrap_or(&[])
    }

    /// The points as an `N × 2` matrix of `[x, y]` rows, ready to be fed to
    /// a layer with two inputs.
    pub fn to_matrix(&self) -> Matrix {
        Matrix {
            rows: self.points.len(),
            cols: 2,
            data: self.points.iter().map(|p| vec![p.x, p.y]).collect(),
        }
    }
}

/// Parameters for [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiralConfig {
    /// Points per arm; must be at least 2.
    pub samples: usize,
    /// Number of arms, one label per arm.
    pub classes: usize,
    /// Standard deviation of the angular noise.
    pub noise: f64,
    /// Seed for the noise; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        SpiralConfig {
            samples: 100,
            classes: 3,
            noise: DEFAULT_NOISE,
            seed: None,
        }
    }
}

impl SpiralConfig {
    pub fn new(samples: usize, classes: usize) -> Self {
        SpiralConfig { samples, classes, ..SpiralConfig::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates a dataset, seeding the noise from `self.seed` when set.
    pub fn generate(&self) -> Result<Dataset> {
        match self.seed {
            Some(seed) => self.generate_with(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => self.generate_with(&mut rand::thread_rng()),
        }
    }

    /// Generates a dataset drawing the noise from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Dataset> {
        spiral(self.samples, self.classes, self.noise, rng)
    }
}

/// Generates `samples` points for each of `classes` interleaved spiral arms,
/// with the default angular noise drawn from `rng`.
///
/// Point `i` of arm `c` sits at radius `i / (samples - 1)` and angle
/// `c*4 + i*4/samples + N(0, 0.2²)`, scaled by 2.5 before taking
/// `x = r·sin`, `y = r·cos`. Fails for `samples < 2`; `classes == 0` gives an
/// empty dataset.
pub fn generate<R: Rng + ?Sized>(samples: usize, classes: usize, rng: &mut R) -> Result<Dataset> {
    spiral(samples, classes, DEFAULT_NOISE, rng)
}

fn spiral<R: Rng + ?Sized>(samples: usize, classes: usize, noise: f64, rng: &mut R) -> Result<Dataset> {
    if !noise.is_finite() {
        return Err(NnError::InvalidNoise { noise });
    }
    let total = dataset_len(samples, classes)?;
    let mut points = Vec::with_capacity(total);
    let mut labels = Vec::with_capacity(total);

    for class in 0..classes {
        for i in 0..samples {
            let r = i as f64 / (samples - 1) as f64;
            let jitter: f64 = StandardNormal.sample(rng);
            let t = class as f64 * ARM_SWEEP + i as f64 * ARM_SWEEP / samples as f64 + jitter * noise;
            let angle = t * ANGLE_SCALE;
            points.push(Point { x: r * angle.sin(), y: r * angle.cos() });
            labels.push(class);
        }
    }

    debug!(samples, classes, points = points.len(), "generated spiral dataset");
    Ok(Dataset { samples_per_class: samples, classes, points, labels })
}
