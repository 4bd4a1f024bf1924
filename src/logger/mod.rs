//! Tracing bootstrap. The subscriber is installed before settings are read,
//! then re-filtered from the settings file once it is parsed.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
