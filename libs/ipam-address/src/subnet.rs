use std::fmt;
use std::net::{AddrParseError, IpAddr};
use std::num::ParseIntError;
use std::str::FromStr;

use crate::address::{self, Child, IpFamily};

/// A CIDR block: a network address together with the number of leading bits
/// that are fixed.
///
/// The network address never has host bits set: parsing `10.10.1.127/25`
/// yields `10.10.1.0/25`. Equality, ordering and the canonical string form
/// all follow from that.
///
/// Ordering sorts IPv4 before IPv6, then by network address, then wider
/// blocks before narrower ones.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IpPrefix {
    family:  IpFamily,
    network: u128,
    len:     u8,
}

/// An address inside a block, written with the block's length, as assigned
/// to an interface: `10.10.1.1/30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IfaceAddress {
    pub address: IpAddr,
    pub len:     u8,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid prefix length /{len} for {family}")]
pub struct PrefixLenError {
    pub family: IpFamily,
    pub len:    u8,
}

#[derive(Debug, thiserror::Error)]
pub enum PrefixParseError {
    #[error("no slash in {0:?}")]
    NoSlash(String),
    #[error("bad address in {input:?}")]
    ParseAddrError {
        input:  String,
        #[source]
        source: AddrParseError,
    },
    #[error("bad prefix length in {input:?}")]
    ParseLenError {
        input:  String,
        #[source]
        source: ParseIntError,
    },
    #[error("bad prefix length in {input:?}")]
    InvalidLen {
        input:  String,
        #[source]
        source: PrefixLenError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ArithmeticError {
    #[error("insufficient address space to extend prefix {0}")]
    InsufficientAddressSpace(IpPrefix),
    #[error("incrementing {address} overflows {within}")]
    AddressSpaceExhausted { address: IpAddr, within: IpPrefix },
}

impl IpPrefix {
    /// Builds a block from any address inside it.
    pub fn new(address: IpAddr, len: u8) -> Result<Self, PrefixLenError> {
        let (value, family) = address::from_address(address);
        Self::from_bits(value, family, len)
    }

    pub fn from_bits(value: u128, family: IpFamily, len: u8) -> Result<Self, PrefixLenError> {
        if len > family.bits() {
            return Err(PrefixLenError { family, len })
        }
        let network = value & address::network_mask(family, len);
        Ok(Self {
            family,
            network,
            len,
        })
    }

    pub fn family(&self) -> IpFamily {
        self.family
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn network(&self) -> IpAddr {
        address::to_address(self.network, self.family)
    }

    pub fn network_bits(&self) -> u128 {
        self.network
    }

    pub fn host_bits(&self) -> u8 {
        self.family.bits() - self.len
    }

    /// `2^(bits - len)`; only `::/0` does not fit.
    pub fn address_count(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.host_bits()))
    }

    pub fn first(&self) -> IpAddr {
        self.network()
    }

    pub fn last(&self) -> IpAddr {
        address::to_address(self.last_bits(), self.family)
    }

    pub fn address_range(&self) -> (IpAddr, IpAddr) {
        (self.first(), self.last())
    }

    pub(crate) fn last_bits(&self) -> u128 {
        self.network | address::host_mask(self.family, self.len)
    }

    /// One of the two halves of this block.
    pub fn subnet(&self, child: Child) -> Result<Self, ArithmeticError> {
        if self.len >= self.family.bits() {
            return Err(ArithmeticError::InsufficientAddressSpace(*self))
        }
        let len = self.len + 1;
        let network = address::set_child_bit(self.network, self.family, child, len);
        Ok(Self {
            family: self.family,
            network,
            len,
        })
    }

    /// Both halves of this block, lower one first.
    pub fn halves(&self) -> Result<(Self, Self), ArithmeticError> {
        Ok((self.subnet(Child::Zero)?, self.subnet(Child::One)?))
    }

    /// Which half of its parent this block is.
    pub fn child_index(&self) -> Option<Child> {
        (self.len > 0).then(|| Child::of(self.network, self.family, self.len))
    }

    /// The network address with this block's child bit cleared, i.e. the
    /// value this block shares with its sibling.
    pub fn sibling_base(&self) -> Option<u128> {
        (self.len > 0).then(|| address::clear_bit_at(self.network, self.family, self.len))
    }

    pub fn parent(&self) -> Option<Self> {
        let base = self.sibling_base()?;
        Some(Self {
            family:  self.family,
            network: base,
            len:     self.len - 1,
        })
    }

    pub fn sibling(&self) -> Option<Self> {
        let child = match self.child_index()? {
            Child::Zero => Child::One,
            Child::One => Child::Zero,
        };
        let network = address::set_child_bit(self.network, self.family, child, self.len);
        Some(Self { network, ..*self })
    }

    /// `self` is the same block as `other` or a wider block around it.
    pub fn contains(&self, other: &Self) -> bool {
        self.family == other.family
            && self.len <= other.len
            && other.network & address::network_mask(self.family, self.len) == self.network
    }

    pub fn contains_address(&self, address: IpAddr) -> bool {
        let (value, family) = address::from_address(address);
        self.family == family && value & address::network_mask(family, self.len) == self.network
    }

    /// Either block contains the other. CIDR blocks never partially overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// The smallest block containing both `a` and `b`, or `None` when they
    /// belong to different families.
    pub fn max_common_prefix(a: &Self, b: &Self) -> Option<Self> {
        if a.family != b.family {
            return None
        }
        let common = address::common_leading_bits(a.network, b.network, a.family);
        let len = a.len.min(b.len).min(common);
        let network = a.network & address::network_mask(a.family, len);
        Some(Self {
            family: a.family,
            network,
            len,
        })
    }

    /// The next address after `address`, failing if it would leave this
    /// block.
    pub fn increment_address(&self, address: IpAddr) -> Result<IpAddr, ArithmeticError> {
        let (value, family) = address::from_address(address);
        let next = address::to_address(address::wrapping_increment(value, family), family);
        if !self.contains_address(next) {
            return Err(ArithmeticError::AddressSpaceExhausted {
                address,
                within: *self,
            })
        }
        Ok(next)
    }

    /// Total address count of a set of blocks, saturating at `u128::MAX`.
    pub fn total_address_count<'a>(prefixes: impl IntoIterator<Item = &'a Self>) -> u128 {
        prefixes
            .into_iter()
            .map(|p| p.address_count().unwrap_or(u128::MAX))
            .fold(0u128, u128::saturating_add)
    }
}

impl IfaceAddress {
    pub fn prefix(&self) -> Result<IpPrefix, PrefixLenError> {
        IpPrefix::new(self.address, self.len)
    }
}

impl From<IpPrefix> for IpAddr {
    fn from(prefix: IpPrefix) -> Self {
        prefix.network()
    }
}

impl FromStr for IpPrefix {
    type Err = PrefixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let IfaceAddress { address, len } = s.parse()?;
        Self::new(address, len).map_err(|source| {
            PrefixParseError::InvalidLen {
                input: s.to_owned(),
                source,
            }
        })
    }
}

impl FromStr for IfaceAddress {
    type Err = PrefixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = || s.to_owned();
        let (addr, len) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| PrefixParseError::NoSlash(input()))?;
        let address: IpAddr = addr.parse().map_err(|source| {
            PrefixParseError::ParseAddrError {
                input: input(),
                source,
            }
        })?;
        let len: u8 = len.parse().map_err(|source| {
            PrefixParseError::ParseLenError {
                input: input(),
                source,
            }
        })?;
        let family = IpFamily::of(&address);
        if len > family.bits() {
            return Err(PrefixParseError::InvalidLen {
                input:  input(),
                source: PrefixLenError { family, len },
            })
        }

        Ok(Self { address, len })
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}
impl fmt::Debug for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for IfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.len)
    }
}

macro_rules! impl_serde_via_str {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.to_string().serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use serde::Deserialize;
                String::deserialize(deserializer)?
                    .parse()
                    .map_err(<D::Error as serde::de::Error>::custom)
            }
        }
    };
}

impl_serde_via_str!(IpPrefix);
impl_serde_via_str!(IfaceAddress);
