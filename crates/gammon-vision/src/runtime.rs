//! One-time bootstrap of the default vision backend.
//!
//! Embedders call [`init`] once before building a
//! [`BoardAnalyzer`](crate::BoardAnalyzer) and may poll [`is_ready`] from
//! elsewhere. The backend is statically linked, so initialisation completes
//! synchronously; repeated calls return the same instance.

use crate::backend::ImageprocBackend;
use log::info;
use std::sync::OnceLock;

static BACKEND: OnceLock<ImageprocBackend> = OnceLock::new();

/// Initialise the runtime and return the shared backend.
pub fn init() -> &'static ImageprocBackend {
    BACKEND.get_or_init(|| {
        info!("vision runtime ready (imageproc backend)");
        ImageprocBackend::new()
    })
}

/// `true` once [`init`] has completed.
pub fn is_ready() -> bool {
    BACKEND.get().is_some()
}
