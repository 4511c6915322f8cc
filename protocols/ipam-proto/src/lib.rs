// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

mod connection;
mod errors;
mod extra_prefix;

pub use connection::{ConnectionId, ConnectionInfo, ExtractResponse};
pub use errors::{AllocError, AllocErrorKind};
pub use extra_prefix::ExtraPrefixRequest;
