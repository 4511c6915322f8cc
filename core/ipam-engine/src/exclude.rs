use ipam_address::cidr::CidrLike;
use ipam_address::subnet::IpPrefix;
use ipam_common::log;
use ipam_proto::{AllocError, AllocErrorKind};

use crate::merge::release_prefixes;

/// Takes the ranges in `excluded` out of `pool`.
///
/// A pool block inside an excluded range goes away entirely. A pool block
/// around an excluded range is halved toward it until the excluded length is
/// reached; the halves facing away stay in the pool. Excluded ranges that
/// touch nothing are ignored.
///
/// Returns the blocks taken out, suitable for [`release_excluded_prefixes`],
/// and the new pool. Fails with `PoolExhausted` if nothing would be left.
pub fn exclude_prefixes<E>(
    pool: &[IpPrefix],
    excluded: &[E],
) -> Result<(Vec<IpPrefix>, Vec<IpPrefix>), AllocError>
where
    E: CidrLike,
{
    let (removed, working) = carve_out(pool, excluded)?;
    if working.is_empty() {
        return Err(AllocError::new(
            AllocErrorKind::PoolExhausted,
            "the available address pool is empty, probably intersected by excluded prefixes",
        ))
    }
    Ok((removed, working))
}

/// Same as [`exclude_prefixes`], but nothing left is not an error.
///
/// Splits `blocks` into the parts inside `excluded` and the parts outside.
pub fn carve_out<E>(
    blocks: &[IpPrefix],
    excluded: &[E],
) -> Result<(Vec<IpPrefix>, Vec<IpPrefix>), AllocError>
where
    E: CidrLike,
{
    let mut working = blocks.to_vec();
    let mut removed = vec![];

    for cidr in excluded {
        let excluded = cidr.to_prefix().map_err(AllocError::from_source)?;

        let mut kept = Vec::with_capacity(working.len());
        let mut split_off = vec![];
        for block in working {
            if !block.overlaps(&excluded) {
                kept.push(block);
                continue
            }
            if excluded.contains(&block) {
                log::trace!("{} swallows {}", excluded, block);
                removed.push(block);
                continue
            }

            let mut current = block;
            while current.len() < excluded.len() {
                let (lower, upper) = current.halves().map_err(AllocError::from_source)?;
                let (toward, away) = if lower.contains(&excluded) {
                    (lower, upper)
                } else {
                    (upper, lower)
                };
                split_off.push(away);
                current = toward;
            }
            log::trace!("{} carved out of {}", current, block);
            removed.push(current);
        }

        working = kept;
        working.extend(split_off);
    }

    Ok((removed, working))
}

/// Puts blocks previously returned by [`exclude_prefixes`] back into `pool`.
pub fn release_excluded_prefixes<B>(
    pool: &[IpPrefix],
    excluded: &[B],
) -> Result<Vec<IpPrefix>, AllocError>
where
    B: CidrLike,
{
    release_prefixes(pool, excluded)
}
