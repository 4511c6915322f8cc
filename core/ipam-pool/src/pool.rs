use std::collections::BTreeMap;
use std::sync::Arc;

use ipam_address::address::IpFamily;
use ipam_address::cidr::CidrLike;
use ipam_address::subnet::{IfaceAddress, IpPrefix};
use ipam_common::errors::chain::StdErrorDisplayChainExt;
use ipam_common::log;
use ipam_proto::{
    AllocError, AllocErrorKind, ConnectionId, ConnectionInfo, ExtraPrefixRequest, ExtractResponse,
};
use parking_lot::RwLock;

use crate::snapshot::PoolSnapshot;

/// What `extract` does for a connection that already holds a subnet.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateConnection`.
    #[default]
    Reject,
    /// Give the old blocks back, then allocate afresh.
    Replace,
}

/// The free blocks of a set of base prefixes, the blocks handed out to each
/// live connection, and the blocks excluded from allocation.
///
/// Every operation runs under one lock: mutations take it exclusively,
/// queries share it. A failed operation leaves the pool as it was.
#[derive(Debug)]
pub struct PrefixPool {
    base_prefixes: Arc<[IpPrefix]>,
    on_duplicate:  DuplicatePolicy,
    state:         RwLock<State>,
}

#[derive(Debug)]
struct State {
    blocks:      Blocks,
    connections: BTreeMap<ConnectionId, ConnectionInfo>,
}

/// Free, excluded and leased blocks together cover the base prefixes
/// exactly once.
#[derive(Debug, Clone, Default)]
struct Blocks {
    free:                Vec<IpPrefix>,
    excluded:            Vec<IpPrefix>,
    /// Parts of leased blocks that were excluded while leased. They join
    /// `excluded` once their connection lets go of them.
    excluded_on_release: Vec<IpPrefix>,
}

static_assertions::assert_impl_all!(PrefixPool: Send, Sync);

impl PrefixPool {
    /// Fails if any of `prefixes` is malformed, or if two of them overlap.
    pub fn new<C>(prefixes: &[C]) -> Result<Self, AllocError>
    where
        C: CidrLike,
    {
        let prefixes = prefixes
            .iter()
            .map(|cidr| cidr.to_prefix().map_err(AllocError::from_source))
            .collect::<Result<Vec<_>, _>>()?;
        ipam_engine::check_disjoint(&prefixes)?;

        log::debug!("new pool over {:?}", prefixes);

        let state = State {
            blocks:      Blocks {
                free: prefixes.clone(),
                ..Default::default()
            },
            connections: Default::default(),
        };
        Ok(Self {
            base_prefixes: prefixes.into(),
            on_duplicate:  Default::default(),
            state:         RwLock::new(state),
        })
    }

    pub fn with_duplicate_policy(self, on_duplicate: DuplicatePolicy) -> Self {
        Self {
            on_duplicate,
            ..self
        }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.on_duplicate
    }

    /// The prefixes the pool was created with.
    pub fn base_prefixes(&self) -> &[IpPrefix] {
        &self.base_prefixes
    }

    /// Hands a point-to-point subnet (`/30` or `/126`) to `connection_id`,
    /// plus whatever `requests` ask for.
    ///
    /// The two endpoint addresses are the first two after the subnet's
    /// network address.
    pub fn extract(
        &self,
        connection_id: impl Into<ConnectionId>,
        family: IpFamily,
        requests: &[ExtraPrefixRequest],
    ) -> Result<ExtractResponse, AllocError> {
        let connection_id = connection_id.into();
        let mut state = self.state.write();

        let result = state.extract(&connection_id, family, requests, self.on_duplicate);
        match &result {
            Ok(response) => {
                log::info!(
                    "{} got {}-{} (+{} extra)",
                    connection_id,
                    response.src_address,
                    response.dst_address,
                    response.extra_prefixes.len()
                )
            },
            Err(reason) => {
                log::warn!(
                    "extract for {} failed: {}",
                    connection_id,
                    reason.as_display_chain()
                )
            },
        }
        if result.is_ok() {
            state.check_invariants(&self.base_prefixes);
        }
        result
    }

    /// Returns every block held by `connection_id` to the pool.
    ///
    /// Parts excluded while the connection held them become excluded
    /// instead of free.
    pub fn release(&self, connection_id: &str) -> Result<(), AllocError> {
        let mut state = self.state.write();

        let Some(info) = state.connections.get(connection_id) else {
            log::warn!("release of unknown connection {}", connection_id);
            return Err(connection_not_found(connection_id))
        };
        let held = info.prefixes().copied().collect::<Vec<_>>();
        let mut blocks = state.blocks.clone();
        blocks.give_back(&held)?;

        state.blocks = blocks;
        state.connections.remove(connection_id);
        state.check_invariants(&self.base_prefixes);

        log::info!("{} released", connection_id);
        Ok(())
    }

    pub fn get_connection_information(
        &self,
        connection_id: &str,
    ) -> Result<ConnectionInfo, AllocError> {
        self.state
            .read()
            .connections
            .get(connection_id)
            .cloned()
            .ok_or_else(|| connection_not_found(connection_id))
    }

    /// The free blocks as text, in textual order.
    pub fn get_prefixes(&self) -> Vec<String> {
        let mut out = self
            .state
            .read()
            .blocks
            .free
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        out.sort();
        out
    }

    /// The free blocks, lowest address first.
    pub fn prefixes(&self) -> Vec<IpPrefix> {
        let mut out = self.state.read().blocks.free.clone();
        out.sort();
        out
    }

    /// The excluded blocks, lowest address first.
    pub fn excluded_prefixes(&self) -> Vec<IpPrefix> {
        let mut out = self.state.read().blocks.excluded.clone();
        out.sort();
        out
    }

    /// Whether `candidate` shares an address with any free block.
    pub fn intersect(&self, candidate: impl CidrLike) -> Result<bool, AllocError> {
        let candidate = candidate.to_prefix().map_err(AllocError::from_source)?;
        Ok(ipam_engine::intersects(&self.state.read().blocks.free, &candidate))
    }

    /// Takes `excluded` out of the free blocks, returning what was taken.
    ///
    /// Blocks already handed out to connections stay with them until they
    /// are released, and are excluded then.
    pub fn exclude_prefixes<E>(&self, excluded: &[E]) -> Result<Vec<IpPrefix>, AllocError>
    where
        E: CidrLike,
    {
        let mut state = self.state.write();

        let mut blocks = state.blocks.clone();
        let (removed, free) = ipam_engine::exclude_prefixes(&blocks.free, excluded)?;
        blocks.free = free;
        blocks.excluded.extend_from_slice(&removed);

        for (connection_id, info) in &state.connections {
            let held = info.prefixes().copied().collect::<Vec<_>>();
            let (hit, _) = ipam_engine::carve_out(&held, excluded)?;
            let (_, hit) = ipam_engine::carve_out(&hit, &blocks.excluded_on_release)?;
            for block in &hit {
                log::warn!(
                    "{} is held by {}, it will be excluded on release",
                    block,
                    connection_id
                );
            }
            blocks.excluded_on_release.extend(hit);
        }

        state.blocks = blocks;
        state.check_invariants(&self.base_prefixes);

        log::debug!("excluded {:?}", removed);
        Ok(removed)
    }

    /// Returns blocks taken out by [`exclude_prefixes`](Self::exclude_prefixes).
    ///
    /// Fails with `NotExcluded` if any part of them is not currently
    /// excluded, and with `OverlapDetected` if they overlap each other.
    pub fn release_excluded_prefixes<E>(&self, excluded: &[E]) -> Result<(), AllocError>
    where
        E: CidrLike,
    {
        let mut state = self.state.write();

        let returning = excluded
            .iter()
            .map(|cidr| cidr.to_prefix().map_err(AllocError::from_source))
            .collect::<Result<Vec<_>, _>>()?;
        ipam_engine::check_disjoint(&returning)?;

        let (_, stray) = ipam_engine::carve_out(&returning, &state.blocks.excluded)?;
        if let Some(stray) = stray.first() {
            return Err(AllocError::new(
                AllocErrorKind::NotExcluded,
                format!("{} is not excluded", stray),
            ))
        }

        let (_, still_excluded) = ipam_engine::carve_out(&state.blocks.excluded, &returning)?;
        let free = ipam_engine::release_excluded_prefixes(&state.blocks.free, &returning)?;
        state.blocks.free = free;
        state.blocks.excluded = still_excluded;
        state.check_invariants(&self.base_prefixes);

        log::debug!("returned {:?}", returning);
        Ok(())
    }

    pub fn connection_count(&self) -> usize {
        self.state.read().connections.len()
    }

    /// Number of free addresses, saturating at `u128::MAX`.
    pub fn free_address_count(&self) -> u128 {
        IpPrefix::total_address_count(&self.state.read().blocks.free)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.read();
        let mut prefixes = state.blocks.free.clone();
        prefixes.sort();
        let mut excluded = state.blocks.excluded.clone();
        excluded.sort();
        PoolSnapshot {
            base_prefixes: self.base_prefixes.to_vec(),
            prefixes,
            excluded,
            connections: state.connections.clone(),
        }
    }
}

impl Blocks {
    /// Puts `held` back among the free blocks, except for the parts that
    /// were excluded while it was leased.
    fn give_back(&mut self, held: &[IpPrefix]) -> Result<(), AllocError> {
        let (withheld, returned) = ipam_engine::carve_out(held, &self.excluded_on_release)?;
        self.free = ipam_engine::release_prefixes(&self.free, &returned)?;
        if !withheld.is_empty() {
            log::info!("{:?} stays excluded", withheld);
            self.excluded_on_release
                .retain(|pending| !held.iter().any(|block| block.contains(pending)));
            self.excluded.extend(withheld);
        }
        Ok(())
    }
}

impl State {
    fn extract(
        &mut self,
        connection_id: &ConnectionId,
        family: IpFamily,
        requests: &[ExtraPrefixRequest],
        on_duplicate: DuplicatePolicy,
    ) -> Result<ExtractResponse, AllocError> {
        let mut blocks = self.blocks.clone();
        if let Some(existing) = self.connections.get(connection_id) {
            match on_duplicate {
                DuplicatePolicy::Reject => {
                    return Err(AllocError::new(
                        AllocErrorKind::DuplicateConnection,
                        format!("{} already holds {}", connection_id, existing.subnet),
                    ))
                },
                DuplicatePolicy::Replace => {
                    log::debug!(
                        "{} gives back {} before extracting again",
                        connection_id,
                        existing.subnet
                    );
                    let held = existing.prefixes().copied().collect::<Vec<_>>();
                    blocks.give_back(&held)?;
                },
            }
        }

        let (subnet, mut free) =
            ipam_engine::extract_prefix(&blocks.free, family, family.p2p_prefix_len())?;
        let src = subnet
            .increment_address(subnet.first())
            .map_err(AllocError::from_source)?;
        let dst = subnet
            .increment_address(src)
            .map_err(AllocError::from_source)?;

        let mut extra_prefixes = vec![];
        if !requests.is_empty() {
            (extra_prefixes, free) = ipam_engine::extract_prefixes(&free, requests)?;
        }

        blocks.free = free;
        self.blocks = blocks;
        self.connections.insert(
            connection_id.clone(),
            ConnectionInfo {
                subnet,
                extra_prefixes: extra_prefixes.clone(),
            },
        );

        Ok(ExtractResponse {
            src_address: IfaceAddress {
                address: src,
                len:     subnet.len(),
            },
            dst_address: IfaceAddress {
                address: dst,
                len:     subnet.len(),
            },
            extra_prefixes,
        })
    }

    fn check_invariants(&self, base_prefixes: &[IpPrefix]) {
        #[cfg(debug_assertions)]
        {
            let everything = self
                .blocks
                .free
                .iter()
                .chain(&self.blocks.excluded)
                .chain(self.connections.values().flat_map(ConnectionInfo::prefixes))
                .copied()
                .collect::<Vec<_>>();
            if let Err(reason) = ipam_engine::check_disjoint(&everything) {
                panic!("pool invariant violated: {}", reason)
            }
            assert_eq!(
                IpPrefix::total_address_count(&everything),
                IpPrefix::total_address_count(base_prefixes),
                "pool invariant violated: addresses lost or created"
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = base_prefixes;
    }
}

fn connection_not_found(connection_id: &str) -> AllocError {
    AllocError::new(
        AllocErrorKind::ConnectionNotFound,
        format!("no connection {}", connection_id),
    )
}
