// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

pub mod errors;
#[cfg(feature = "logging")]
pub mod log;
