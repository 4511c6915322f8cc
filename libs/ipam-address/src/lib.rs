// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

pub mod address;
pub mod address_range;
pub mod cidr;
pub mod subnet;
