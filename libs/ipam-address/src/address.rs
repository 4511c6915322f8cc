//! Bit-level arithmetic over IP addresses.
//!
//! Both families are handled by one code path: an address is held as a `u128`
//! right-aligned to its family's width, so an IPv4 address occupies the low 32
//! bits and the high 96 bits stay zero. Every function here keeps that
//! invariant.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum IpFamily {
    #[serde(rename = "ipv4", alias = "IPV4")]
    V4,
    #[serde(rename = "ipv6", alias = "IPV6")]
    V6,
}

/// Which half of a block to take when it is split by one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Child {
    Zero,
    One,
}

impl IpFamily {
    pub const fn bits(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    pub const fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    /// Length of the point-to-point block handed to a connection: room for
    /// the network address plus the two endpoints.
    pub const fn p2p_prefix_len(self) -> u8 {
        match self {
            Self::V4 => 30,
            Self::V6 => 126,
        }
    }

    pub const fn all_ones(self) -> u128 {
        match self {
            Self::V4 => u32::MAX as u128,
            Self::V6 => u128::MAX,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}

impl Child {
    pub const BOTH: [Self; 2] = [Self::Zero, Self::One];

    pub fn of(value: u128, family: IpFamily, len: u8) -> Self {
        debug_assert!((1..=family.bits()).contains(&len));
        if value >> (family.bits() - len) & 1 == 0 {
            Self::Zero
        } else {
            Self::One
        }
    }
}

pub fn from_address(ip: IpAddr) -> (u128, IpFamily) {
    match ip {
        IpAddr::V4(v4) => (u32::from(v4) as u128, IpFamily::V4),
        IpAddr::V6(v6) => (u128::from(v6), IpFamily::V6),
    }
}

/// Inverse of [`from_address`]. Bits above the family's width are dropped.
pub fn to_address(value: u128, family: IpFamily) -> IpAddr {
    match family {
        IpFamily::V4 => IpAddr::V4(Ipv4Addr::from((value & IpFamily::V4.all_ones()) as u32)),
        IpFamily::V6 => IpAddr::V6(Ipv6Addr::from(value)),
    }
}

/// Sets the bit that tells the two halves of a `new_len - 1` block apart,
/// yielding the network address of the requested half.
pub fn set_child_bit(value: u128, family: IpFamily, child: Child, new_len: u8) -> u128 {
    debug_assert!(
        (1..=family.bits()).contains(&new_len),
        "no child bit for /{} in {}",
        new_len,
        family
    );
    let bit = 1u128 << (family.bits() - new_len);
    match child {
        Child::Zero => value & !bit,
        Child::One => value | bit,
    }
}

/// Clears the lowest fixed bit of a `len` block. Two blocks of the same
/// length are siblings iff this gives the same value for both.
pub fn clear_bit_at(value: u128, family: IpFamily, len: u8) -> u128 {
    set_child_bit(value, family, Child::Zero, len)
}

/// The bits not fixed by a prefix of length `len`.
pub fn host_mask(family: IpFamily, len: u8) -> u128 {
    debug_assert!(len <= family.bits());
    let host_bits = u32::from(family.bits() - len);
    let mask = 1u128.checked_shl(host_bits).map_or(u128::MAX, |b| b - 1);
    mask & family.all_ones()
}

pub fn network_mask(family: IpFamily, len: u8) -> u128 {
    family.all_ones() & !host_mask(family, len)
}

/// Number of leading bits `a` and `b` have in common within the family's
/// width.
pub fn common_leading_bits(a: u128, b: u128, family: IpFamily) -> u8 {
    let unused = 128 - u32::from(family.bits());
    ((a ^ b).leading_zeros() - unused) as u8
}

/// Adds one, wrapping around at the end of the family's address space.
pub fn wrapping_increment(value: u128, family: IpFamily) -> u128 {
    value.wrapping_add(1) & family.all_ones()
}
