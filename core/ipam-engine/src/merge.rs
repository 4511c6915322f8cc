use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use ipam_address::address::IpFamily;
use ipam_address::cidr::CidrLike;
use ipam_address::subnet::IpPrefix;
use ipam_common::log;
use ipam_proto::AllocError;

/// Returns `released` to `pool`, fusing sibling blocks into their parents
/// until no two blocks share a parent.
///
/// Entries are deduplicated by their text as supplied; each one is then
/// reduced to its network address. Two entries of one length that reduce to
/// the same parent are fused, so `10.10.1.127/25` released next to
/// `10.10.1.0/25` yields `10.10.1.0/24`.
///
/// With nothing released, the pool is returned as it is. Otherwise the
/// result is sorted.
pub fn release_prefixes<A, B>(pool: &[A], released: &[B]) -> Result<Vec<IpPrefix>, AllocError>
where
    A: CidrLike,
    B: CidrLike,
{
    if released.is_empty() {
        return pool
            .iter()
            .map(|cidr| cidr.to_prefix().map_err(AllocError::from_source))
            .collect()
    }

    let mut seen = HashSet::new();
    let mut by_len = BTreeMap::<u8, Vec<IpPrefix>>::new();
    let entries = pool
        .iter()
        .map(|c| (c.cidr_text(), c.to_prefix()))
        .chain(released.iter().map(|c| (c.cidr_text(), c.to_prefix())));
    for (text, parsed) in entries {
        if !seen.insert(text.into_owned()) {
            continue
        }
        let prefix = parsed.map_err(AllocError::from_source)?;
        by_len.entry(prefix.len()).or_default().push(prefix);
    }

    let mut pass = 0;
    loop {
        pass += 1;
        let merged = merge_pass(&mut by_len);
        log::trace!("merge pass #{}: {} fused", pass, merged);
        if merged == 0 {
            break
        }
    }

    let mut out = by_len.into_values().flatten().collect::<Vec<_>>();
    out.sort();
    Ok(out)
}

/// Visits lengths from the narrowest up, so fusions cascade within one pass.
fn merge_pass(by_len: &mut BTreeMap<u8, Vec<IpPrefix>>) -> usize {
    let mut merged = 0;

    let lengths = by_len.keys().rev().copied().collect::<Vec<_>>();
    for len in lengths {
        let Some(mut blocks) = by_len.remove(&len) else { continue };
        if len == 0 || blocks.len() < 2 {
            by_len.insert(len, blocks);
            continue
        }
        blocks.sort();

        let mut unpaired = BTreeMap::<(IpFamily, u128), IpPrefix>::new();
        let mut parents = vec![];
        for block in blocks {
            let Some(parent) = block.parent() else { continue };
            match unpaired.entry((parent.family(), parent.network_bits())) {
                Entry::Vacant(vacant) => {
                    vacant.insert(block);
                },
                Entry::Occupied(occupied) => {
                    log::trace!("fuse {} and {} into {}", occupied.get(), block, parent);
                    occupied.remove();
                    parents.push(parent);
                },
            }
        }

        merged += parents.len();
        by_len.insert(len, unpaired.into_values().collect());
        if !parents.is_empty() {
            by_len.entry(len - 1).or_default().extend(parents);
        }
    }

    by_len.retain(|_, blocks| !blocks.is_empty());
    merged
}
