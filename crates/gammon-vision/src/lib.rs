//! High-level facade crate for the `gammon-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry, calibration, checker and dice crates
//! - [`BoardAnalyzer`], which calibrates once and then turns frames into
//!   [`FrameSnapshot`](core::FrameSnapshot)s
//! - (feature `image`) a pure-Rust [`VisionBackend`](core::VisionBackend)
//!   on `image`/`imageproc`, its one-time [`runtime`] bootstrap, and
//!   end-to-end helpers from image files.
//!
//! ## Quickstart
//!
//! ```no_run
//! use gammon_vision::{detect, runtime, AnalyzerParams, BoardAnalyzer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = runtime::init();
//! let mut analyzer = BoardAnalyzer::new(backend, AnalyzerParams::default());
//!
//! let board = detect::load_frame("empty_board.png")?;
//! if analyzer.calibrate(&detect::frame_view(&board))? {
//!     let frame = detect::load_frame("frame_0001.png")?;
//!     let snapshot = analyzer.analyze(&detect::frame_view(&frame))?;
//!     println!("{} checkers, dice total {}", snapshot.checkers.len(), snapshot.dice_total());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `gammon_vision::core`: frames, masks, contours, homographies, observations.
//! - `gammon_vision::board`: board outline and point layout.
//! - `gammon_vision::checkers`: checker blobs to board points.
//! - `gammon_vision::dice`: pip clustering.
//! - `gammon_vision::io`: JSON configs and reports.

pub use gammon_board as board;
pub use gammon_checkers as checkers;
pub use gammon_core as core;
pub use gammon_dice as dice;

mod analyzer;
pub mod io;

pub use analyzer::{AnalyzeError, AnalyzerParams, BoardAnalyzer};
pub use gammon_core::{FrameSnapshot, FrameView, VisionBackend, VisionError};

#[cfg(feature = "image")]
pub mod backend;
#[cfg(feature = "image")]
pub mod detect;
#[cfg(feature = "image")]
pub mod runtime;

#[cfg(feature = "image")]
pub use backend::ImageprocBackend;
