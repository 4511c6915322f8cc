use std::collections::BTreeMap;

use ipam_address::subnet::IpPrefix;
use ipam_proto::{ConnectionId, ConnectionInfo};

/// A point-in-time copy of a [`PrefixPool`](crate::PrefixPool).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolSnapshot {
    pub base_prefixes: Vec<IpPrefix>,
    /// Free blocks, lowest address first.
    pub prefixes:      Vec<IpPrefix>,
    /// Blocks taken out by exclusions, lowest address first.
    #[serde(default)]
    pub excluded:      Vec<IpPrefix>,
    pub connections:   BTreeMap<ConnectionId, ConnectionInfo>,
}

impl PoolSnapshot {
    pub fn free_address_count(&self) -> u128 {
        IpPrefix::total_address_count(&self.prefixes)
    }

    pub fn leased_address_count(&self) -> u128 {
        IpPrefix::total_address_count(self.connections.values().flat_map(ConnectionInfo::prefixes))
    }

    pub fn excluded_address_count(&self) -> u128 {
        IpPrefix::total_address_count(&self.excluded)
    }

    /// Free, leased and excluded addresses add up to the base ones.
    pub fn is_conserved(&self) -> bool {
        self.free_address_count()
            .saturating_add(self.leased_address_count())
            .saturating_add(self.excluded_address_count())
            == IpPrefix::total_address_count(&self.base_prefixes)
    }
}
