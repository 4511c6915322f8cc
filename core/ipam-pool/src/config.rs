use ipam_common::log;
use ipam_proto::AllocError;

use crate::{DuplicatePolicy, PrefixPool};

mod validation;

#[cfg(test)]
mod test_serde;
#[cfg(test)]
mod test_validation;

pub use validation::{Valid, ValidationError};

/// Comma-separated prefixes to exclude, on top of the configured ones.
pub const EXCLUDED_PREFIXES_ENV: &str = "EXCLUDED_PREFIXES";

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolConfig {
    /// The blocks to allocate from.
    pub prefixes: Vec<String>,

    /// Ranges owned by someone else, taken out before the first allocation.
    #[serde(default)]
    pub excluded_prefixes: Vec<String>,

    #[serde(default)]
    pub on_duplicate_connection: DuplicatePolicy,
}

impl PoolConfig {
    /// Appends the exclusions listed in [`EXCLUDED_PREFIXES_ENV`], if set.
    pub fn with_env_exclusions(self) -> Self {
        match std::env::var(EXCLUDED_PREFIXES_ENV) {
            Ok(list) => self.with_exclusions_from(&list),
            Err(_) => self,
        }
    }

    /// Appends the exclusions of a comma-separated list. Empty entries are
    /// skipped; malformed ones are kept for [`validate`](Self::validate) to
    /// report.
    pub fn with_exclusions_from(mut self, list: &str) -> Self {
        self.excluded_prefixes.extend(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        );
        self
    }
}

impl PrefixPool {
    pub fn from_config(config: &Valid<PoolConfig>) -> Result<Self, AllocError> {
        let pool = Self::new(&config.prefixes)?.with_duplicate_policy(config.on_duplicate_connection);
        if !config.excluded_prefixes.is_empty() {
            let excluded = pool.exclude_prefixes(&config.excluded_prefixes)?;
            log::info!("{} blocks excluded from the pool", excluded.len());
        }
        Ok(pool)
    }
}
