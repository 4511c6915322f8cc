use std::borrow::Borrow;
use std::sync::Arc;

use ipam_address::subnet::{IfaceAddress, IpPrefix};

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ConnectionId(Arc<str>);

impl ConnectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ConnectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<Arc<str>> for ConnectionId {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}
impl From<String> for ConnectionId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}
impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

/// What a connection is granted by `extract`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtractResponse {
    pub src_address:    IfaceAddress,
    pub dst_address:    IfaceAddress,
    pub extra_prefixes: Vec<IpPrefix>,
}

/// What is on record for a live connection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConnectionInfo {
    pub subnet:         IpPrefix,
    pub extra_prefixes: Vec<IpPrefix>,
}

impl ConnectionInfo {
    pub fn prefixes(&self) -> impl Iterator<Item = &IpPrefix> + '_ {
        std::iter::once(&self.subnet).chain(&self.extra_prefixes)
    }
}
