use ipam_address::address::IpFamily;
use ipam_address::subnet::IpPrefix;
use ipam_common::errors::chain::StdErrorDisplayChainExt;
use ipam_common::log;
use ipam_pool::{PoolSnapshot, PrefixPool};
use ipam_proto::{
    AllocError, ConnectionId, ConnectionInfo, ExtraPrefixRequest, ExtractResponse,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Op {
    Extract(ExtractOp),
    Release(ConnectionId),
    Exclude(Vec<String>),
    ReleaseExcluded(Vec<String>),
    Intersect(String),
    Info(ConnectionId),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExtractOp {
    pub connection: ConnectionId,
    pub family:     IpFamily,
    #[serde(default)]
    pub extra:      Vec<ExtraPrefixRequest>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Extracted(ExtractResponse),
    Released,
    Excluded(Vec<IpPrefix>),
    ReturnedExcluded,
    Intersects(bool),
    Info(ConnectionInfo),
    Failed(AllocError),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StepReport {
    pub step:    usize,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub steps:    Vec<StepReport>,
    pub snapshot: PoolSnapshot,
}

/// Runs every op in order. A failing op is reported and the replay goes on.
pub fn replay(pool: &PrefixPool, script: &[Op]) -> Report {
    let steps = script
        .iter()
        .enumerate()
        .map(|(step, op)| {
            let outcome = run(pool, op).unwrap_or_else(|reason| {
                log::warn!("step #{} failed: {}", step, reason.as_display_chain());
                Outcome::Failed(reason)
            });
            StepReport { step, outcome }
        })
        .collect();
    Report {
        steps,
        snapshot: pool.snapshot(),
    }
}

fn run(pool: &PrefixPool, op: &Op) -> Result<Outcome, AllocError> {
    let outcome = match op {
        Op::Extract(ExtractOp {
            connection,
            family,
            extra,
        }) => Outcome::Extracted(pool.extract(connection.clone(), *family, extra)?),
        Op::Release(connection) => {
            pool.release(connection.as_str())?;
            Outcome::Released
        },
        Op::Exclude(prefixes) => Outcome::Excluded(pool.exclude_prefixes(prefixes)?),
        Op::ReleaseExcluded(prefixes) => {
            pool.release_excluded_prefixes(prefixes)?;
            Outcome::ReturnedExcluded
        },
        Op::Intersect(candidate) => Outcome::Intersects(pool.intersect(candidate)?),
        Op::Info(connection) => {
            Outcome::Info(pool.get_connection_information(connection.as_str())?)
        },
    };
    Ok(outcome)
}
