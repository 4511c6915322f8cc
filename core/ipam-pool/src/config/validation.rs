use std::collections::BTreeSet;
use std::ops::Deref;

use ipam_address::address_range::AddressRange;
use ipam_address::subnet::IpPrefix;
use ipam_common::errors::chain::StdErrorDisplayChainExt;
use ipam_common::errors::error_kind::HasErrorKind;
use ipam_proto::AllocErrorKind;

use crate::config::PoolConfig;

#[derive(Debug, Clone)]
pub struct Valid<C>(C);

#[derive(Debug, thiserror::Error)]
#[error("validation error:{}", errors.iter().map(|e| format!("\n- {}", e)).collect::<String>())]
pub struct ValidationError<T> {
    pub errors:   Vec<String>,
    pub rejected: Box<T>,
}

impl PoolConfig {
    pub fn validate(self) -> Result<Valid<Self>, ValidationError<Self>> {
        TryFrom::try_from(self)
    }
}

impl TryFrom<PoolConfig> for Valid<PoolConfig> {
    type Error = ValidationError<PoolConfig>;

    fn try_from(pool_config: PoolConfig) -> Result<Self, Self::Error> {
        let mut errors = vec![];

        if pool_config.prefixes.is_empty() {
            errors.push("at least one prefix must be defined".to_owned());
        }

        let prefixes = parse_all("prefixes", &pool_config.prefixes, &mut errors);
        let excluded = parse_all("excluded_prefixes", &pool_config.excluded_prefixes, &mut errors);

        let overlapping_prefixes = {
            let mut nets = BTreeSet::<AddressRange>::new();
            let mut conflicts = vec![];

            for &this in &prefixes {
                if let Some(that) = nets.get(&AddressRange::from(this)).map(|r| IpPrefix::from(*r)) {
                    conflicts.push(format!("{} overlaps with {}", this, that));
                } else {
                    nets.insert(this.into());
                }
            }
            conflicts
        };
        let prefixes_are_disjoint = overlapping_prefixes.is_empty();
        errors.extend(overlapping_prefixes);

        if prefixes_are_disjoint && !prefixes.is_empty() {
            if let Err(reason) = ipam_engine::exclude_prefixes(&prefixes, &excluded) {
                if reason.kind() == AllocErrorKind::PoolExhausted {
                    errors.push("excluded prefixes leave nothing to allocate".to_owned());
                } else {
                    errors.push(reason.as_display_chain().to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(Valid(pool_config))
        } else {
            Err(ValidationError {
                errors,
                rejected: Box::new(pool_config),
            })
        }
    }
}

fn parse_all(field: &str, texts: &[String], errors: &mut Vec<String>) -> Vec<IpPrefix> {
    let mut parsed = Vec::with_capacity(texts.len());
    for (idx, text) in texts.iter().enumerate() {
        match text.parse::<IpPrefix>() {
            Ok(prefix) => parsed.push(prefix),
            Err(reason) => errors.push(format!("{}[{}]: {}", field, idx, reason.as_display_chain())),
        }
    }
    parsed
}

impl<C> Deref for Valid<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
