use std::fmt;

use crate::address::{self, IpFamily};
use crate::subnet::IpPrefix;

/// A range of addresses corresponding to some [`IpPrefix`].
///
/// The only way to create an instance of [`AddressRange`] is from an
/// [`IpPrefix`], thus only aligned ranges are represented by this type.
///
/// This type can be used as a key in a key-value collection that uses `Ord` for
/// its keys. (**NB:** the equality is defined as "if the ranges overlap — they
/// are equal"; ranges of different families never overlap)
#[derive(Debug, Clone, Copy)]
pub struct AddressRange {
    family: IpFamily,
    lo:     u128,
    hi:     u128,
}

impl AddressRange {
    pub fn family(&self) -> IpFamily {
        self.family
    }

    pub fn lo(&self) -> std::net::IpAddr {
        address::to_address(self.lo, self.family)
    }

    pub fn hi(&self) -> std::net::IpAddr {
        address::to_address(self.hi, self.family)
    }
}

impl From<IpPrefix> for AddressRange {
    fn from(prefix: IpPrefix) -> Self {
        Self {
            family: prefix.family(),
            lo:     prefix.network_bits(),
            hi:     prefix.last_bits(),
        }
    }
}

impl From<AddressRange> for IpPrefix {
    fn from(range: AddressRange) -> Self {
        let AddressRange { family, lo, hi } = range;
        let len = address::common_leading_bits(lo, hi, family);
        IpPrefix::from_bits(lo, family, len).expect("common leading bits fit the family")
    }
}

impl Ord for AddressRange {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering::*;

        assert!(self.lo <= self.hi);
        assert!(other.lo <= other.hi);

        if self.family != other.family {
            return self.family.cmp(&other.family)
        }

        match (self.hi.cmp(&other.lo), self.lo.cmp(&other.hi)) {
            (Less, Less) => Less,
            (Greater, Greater) => Greater,
            (..) => Equal,
        }
    }
}
impl PartialEq for AddressRange {
    fn eq(&self, other: &Self) -> bool {
        Ord::cmp(self, other).is_eq()
    }
}
impl Eq for AddressRange {}
impl PartialOrd for AddressRange {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo(), self.hi())
    }
}
