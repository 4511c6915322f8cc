use std::collections::BTreeSet;

use ipam_address::address_range::AddressRange;
use ipam_address::subnet::IpPrefix;
use ipam_proto::{AllocError, AllocErrorKind};

/// Fails with `OverlapDetected` on the first block that shares an address
/// with an earlier one.
pub fn check_disjoint(pool: &[IpPrefix]) -> Result<(), AllocError> {
    let mut ranges = BTreeSet::new();
    for &block in pool {
        if let Some(existing) = ranges.replace(AddressRange::from(block)) {
            return Err(AllocError::new(
                AllocErrorKind::OverlapDetected,
                format!("{} overlaps with {}", block, IpPrefix::from(existing)),
            ))
        }
    }
    Ok(())
}

/// Whether any block in `pool` shares an address with `prefix`.
pub fn intersects(pool: &[IpPrefix], prefix: &IpPrefix) -> bool {
    pool.iter().any(|block| block.overlaps(prefix))
}
