//! The allocation engine.
//!
//! A pool is a list of disjoint [`IpPrefix`]es. Every function here takes
//! the pool by reference and hands back a new one, so a failed call leaves
//! the caller's pool exactly as it was.
//!
//! - [`extract_prefix`] / [`extract_prefixes`] narrow a free block down to
//!   the requested length, returning the halves that were split off to the
//!   pool.
//! - [`release_prefixes`] puts blocks back and fuses siblings into their
//!   parents for as long as possible.
//! - [`exclude_prefixes`] carves externally owned ranges out of the pool;
//!   [`release_excluded_prefixes`] gives them back. [`carve_out`] splits
//!   any list of blocks along excluded ranges.
//!
//! [`IpPrefix`]: ipam_address::subnet::IpPrefix

// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

mod exclude;
mod merge;
mod overlap;
mod split;

pub use exclude::{carve_out, exclude_prefixes, release_excluded_prefixes};
pub use merge::release_prefixes;
pub use overlap::{check_disjoint, intersects};
pub use split::{extract_prefix, extract_prefixes};
