//! Dice reading from pip blobs.

mod detector;

pub use detector::{cluster_dots, DiceDetector, DiceParams};
