//! The smallest block covering a stream of observed subnets.
//!
//! Subnets reported one at a time (a node's pod range, a service address)
//! widen the covering block only as much as needed to include them.

use std::collections::BTreeMap;

use ipam_address::address::IpFamily;
use ipam_address::subnet::IpPrefix;
use ipam_common::log;

#[derive(Debug, Default, Clone)]
pub struct CoveringSubnet {
    by_family: BTreeMap<IpFamily, IpPrefix>,
}

impl CoveringSubnet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Takes `subnet` into account, returning the covering block of its
    /// family if it has changed.
    pub fn observe(&mut self, subnet: IpPrefix) -> Option<IpPrefix> {
        let family = subnet.family();
        let Some(&current) = self.by_family.get(&family) else {
            log::debug!("first {} subnet {}", family, subnet);
            self.by_family.insert(family, subnet);
            return Some(subnet)
        };

        let widened = IpPrefix::max_common_prefix(&current, &subnet)?;
        if widened == current {
            return None
        }

        log::info!("subnet extended from {} to {}", current, widened);
        self.by_family.insert(family, widened);
        Some(widened)
    }

    pub fn get(&self, family: IpFamily) -> Option<IpPrefix> {
        self.by_family.get(&family).copied()
    }

    /// Covering blocks, IPv4 first.
    pub fn iter(&self) -> impl Iterator<Item = IpPrefix> + '_ {
        self.by_family.values().copied()
    }
}

impl Extend<IpPrefix> for CoveringSubnet {
    fn extend<I: IntoIterator<Item = IpPrefix>>(&mut self, iter: I) {
        for subnet in iter {
            self.observe(subnet);
        }
    }
}

impl FromIterator<IpPrefix> for CoveringSubnet {
    fn from_iter<I: IntoIterator<Item = IpPrefix>>(iter: I) -> Self {
        let mut covering = Self::new();
        covering.extend(iter);
        covering
    }
}
