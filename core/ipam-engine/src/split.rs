use std::cmp::Reverse;

use ipam_address::address::IpFamily;
use ipam_address::subnet::IpPrefix;
use ipam_common::log;
use ipam_proto::{AllocError, AllocErrorKind, ExtraPrefixRequest};

/// Carves one `/prefix_len` block of the given family out of `pool`.
///
/// A block of exactly that length is taken as is. Otherwise the narrowest
/// block that is still wider than needed is halved repeatedly, keeping the
/// lower half each time; the upper halves go back to the pool in its place,
/// narrowest first.
///
/// Returns the carved block and the remaining pool.
pub fn extract_prefix(
    pool: &[IpPrefix],
    family: IpFamily,
    prefix_len: u8,
) -> Result<(IpPrefix, Vec<IpPrefix>), AllocError> {
    let mut remaining = pool.to_vec();
    let carved = take_prefix(&mut remaining, family, prefix_len)?;
    Ok((carved, remaining))
}

/// Serves a batch of requests from `pool`.
///
/// All the required blocks of all the requests are drawn first; if any of
/// them cannot be drawn the whole batch fails. Then each request gets up to
/// its best-effort share, stopping at its first miss.
///
/// Returns the carved blocks in the order they were drawn, and the remaining
/// pool.
pub fn extract_prefixes(
    pool: &[IpPrefix],
    requests: &[ExtraPrefixRequest],
) -> Result<(Vec<IpPrefix>, Vec<IpPrefix>), AllocError> {
    for request in requests {
        request.validate()?;
    }

    let mut remaining = pool.to_vec();
    let mut carved = vec![];

    for request in requests {
        for _ in 0..request.required_number {
            let prefix = take_prefix(&mut remaining, request.addr_family, request.prefix_len)?;
            carved.push(prefix);
        }
    }

    for request in requests {
        for drawn in 0..request.best_effort_number() {
            match take_prefix(&mut remaining, request.addr_family, request.prefix_len) {
                Ok(prefix) => carved.push(prefix),
                Err(reason) => {
                    log::debug!(
                        "best effort for /{} stopped after {} of {}: {}",
                        request.prefix_len,
                        drawn,
                        request.best_effort_number(),
                        reason
                    );
                    break
                },
            }
        }
    }

    if carved.is_empty() && !requests.is_empty() {
        return Err(AllocError::new(
            AllocErrorKind::NoPrefixesAvailable,
            format!("failed to extract prefixes, there is none available in {:?}", pool),
        ))
    }

    Ok((carved, remaining))
}

/// Leaves `pool` untouched on error.
pub(crate) fn take_prefix(
    pool: &mut Vec<IpPrefix>,
    family: IpFamily,
    prefix_len: u8,
) -> Result<IpPrefix, AllocError> {
    if let Some(idx) = pool
        .iter()
        .position(|p| p.family() == family && p.len() == prefix_len)
    {
        return Ok(pool.remove(idx))
    }

    let (idx, root) = pool
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| p.family() == family && p.len() < prefix_len)
        .min_by_key(|(_, p)| Reverse(p.len()))
        .ok_or_else(|| {
            AllocError::new(
                AllocErrorKind::NoRoomForPrefix,
                format!(
                    "failed to find room for an {} /{} in {:?}",
                    family, prefix_len, pool
                ),
            )
        })?;

    let mut block = root;
    let mut split_off = Vec::with_capacity(usize::from(prefix_len - root.len()));
    while block.len() < prefix_len {
        let (lower, upper) = block.halves().map_err(AllocError::from_source)?;
        split_off.push(upper);
        block = lower;
    }
    log::trace!("split {} into {} and {:?}", root, block, split_off);

    split_off.reverse();
    pool.splice(idx..=idx, split_off);

    Ok(block)
}
