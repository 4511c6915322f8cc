//! A pool of CIDR blocks that hands out point-to-point subnets (and extra
//! blocks on request) to connections, and takes them back.
//!
//! [`PrefixPool`] keeps the free blocks and a record per live connection.
//! The block arithmetic lives in `ipam-engine`; this crate adds the
//! bookkeeping, the locking and the configuration.

// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

pub mod covering;
mod pool;
mod snapshot;

#[cfg(feature = "config")]
pub mod config;

pub use pool::{DuplicatePolicy, PrefixPool};
pub use snapshot::PoolSnapshot;
