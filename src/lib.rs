// #![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]

pub mod address {
    //! Addresses, prefixes, address families.
    //!
    //! Both IPv4 and IPv6 are handled the same way: an address is an unsigned
    //! integer as wide as the family, and a prefix fixes some number of its
    //! leading bits.
    //!
    //! > Example:
    //! >
    //! > A prefix `10.10.1.0/24` contains 2^8 addresses: from `10.10.1.0` to
    //! > `10.10.1.255`. Splitting it by one bit yields `10.10.1.0/25` and
    //! > `10.10.1.128/25`.
    //!
    //! Parsing a prefix drops the host bits: `10.10.1.127/25` is
    //! `10.10.1.0/25`. An [`IfaceAddress`] keeps them: `10.10.1.1/30` is an
    //! address within `10.10.1.0/30`, the way it is assigned to an interface.

    pub use ipam_address::address::{Child, IpFamily};
    /// A range of addresses that compares equal to any range it overlaps.
    pub use ipam_address::address_range::AddressRange;
    /// Anything that denotes a prefix: the prefix itself, or its text.
    pub use ipam_address::cidr::CidrLike;
    pub use ipam_address::subnet::{
        ArithmeticError, IfaceAddress, IpPrefix, PrefixLenError, PrefixParseError,
    };
}

pub mod proto {
    //! What goes in and out of a pool.

    pub use ipam_proto::{
        AllocError, AllocErrorKind, ConnectionId, ConnectionInfo, ExtraPrefixRequest,
        ExtractResponse,
    };
}

pub mod engine {
    //! Buddy-style split, merge and exclusion over lists of prefixes.
    //!
    //! These are pure functions: they take a pool by reference and return a
    //! new one, leaving the original as it was when they fail.

    pub use ipam_engine::{
        carve_out, check_disjoint, exclude_prefixes, extract_prefix, extract_prefixes, intersects,
        release_excluded_prefixes, release_prefixes,
    };
}

pub mod pool {
    //! A pool handing out point-to-point subnets to connections.

    #[cfg(feature = "config")]
    pub use ipam_pool::config;
    pub use ipam_pool::covering::CoveringSubnet;
    pub use ipam_pool::{DuplicatePolicy, PoolSnapshot, PrefixPool};
}

pub mod errors {
    //! Errors that know their kind.

    pub use ipam_common::errors::chain::StdErrorDisplayChainExt;
    pub use ipam_common::errors::error_kind::HasErrorKind;
    pub use ipam_common::errors::error_of::ErrorOf;
}

pub use pool::PrefixPool;
