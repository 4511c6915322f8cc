use std::path::{Path, PathBuf};

use eyre::Context;
use ipam_ctl::{Op, replay};
use ipam_logger::LoggingConfig;
use ipam_pool::PrefixPool;
use ipam_pool::config::PoolConfig;
use structopt::StructOpt;

/// Builds a prefix pool from a config file, replays a script of operations
/// against it and prints what happened as YAML.
#[derive(Debug, StructOpt)]
#[structopt(name = "ipam-ctl")]
struct Args {
    /// Pool config: `prefixes`, `excluded_prefixes`, `on_duplicate_connection`.
    #[structopt(long, parse(from_os_str))]
    config: PathBuf,

    /// Operations to replay, in order.
    #[structopt(long, parse(from_os_str))]
    script: PathBuf,

    #[structopt(flatten)]
    logging: LoggingConfig,
}

fn main() -> eyre::Result<()> {
    let args = Args::from_args();
    ipam_logger::init(&args.logging).map_err(|e| eyre::format_err!("logger init: {}", e))?;

    let config: PoolConfig = read_yaml(&args.config).wrap_err("config")?;
    let config = config.with_env_exclusions().validate()?;
    let pool = PrefixPool::from_config(&config)?;

    let script: Vec<Op> = read_yaml(&args.script).wrap_err("script")?;
    let report = replay(&pool, &script);

    print!("{}", serde_yaml::to_string(&report)?);
    Ok(())
}

fn read_yaml<T>(path: &Path) -> eyre::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let text = std::fs::read_to_string(path).wrap_err_with(|| format!("reading {:?}", path))?;
    let value = serde_yaml::from_str(&text).wrap_err_with(|| format!("parsing {:?}", path))?;
    Ok(value)
}
