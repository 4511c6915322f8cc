//! Replays a script of pool operations and reports what each of them did.
//!
//! A script is a YAML list; every entry names one operation:
//!
//! ```yaml
//! - extract: { connection: c1, family: ipv4 }
//! - intersect: 10.20.0.0/24
//! - exclude: [10.20.1.0/24]
//! - release: c1
//! ```

// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

mod script;

pub use script::{ExtractOp, Op, Outcome, Report, StepReport, replay};
