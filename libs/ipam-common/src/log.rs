//! Logging macros used across the ipam crates.
//!
//! Re-exported from `tracing` so that the crates do not depend on it
//! directly and the backend can be swapped in one place.

pub use tracing::{Level, debug, enabled, error, info, trace, warn};
