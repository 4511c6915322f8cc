use ipam::PrefixPool;
use ipam::address::IpFamily;
use ipam::pool::DuplicatePolicy;
use ipam::pool::config::PoolConfig;
use ipam::proto::AllocErrorKind;

const CONFIG: &str = r#"
prefixes:
  - 10.20.0.0/16
  - "fd00::/64"
excluded_prefixes:
  - 10.20.1.10/24
on_duplicate_connection: replace
"#;

#[test]
fn pool_from_yaml() {
    let config: PoolConfig = serde_yaml::from_str(CONFIG).unwrap();
    let config = config
        .with_exclusions_from("10.20.32.0/19, fd00::/80")
        .validate()
        .unwrap();
    let pool = PrefixPool::from_config(&config).unwrap();
    assert_eq!(pool.duplicate_policy(), DuplicatePolicy::Replace);
    assert!(!pool.intersect("10.20.1.0/24").unwrap());
    assert!(!pool.intersect("fd00::1/128").unwrap());

    pool.extract("c1", IpFamily::V4, &[]).unwrap();
    pool.extract("c1", IpFamily::V6, &[]).unwrap();
    assert_eq!(pool.connection_count(), 1);
    assert_eq!(
        pool.get_connection_information("c1")
            .unwrap()
            .subnet
            .family(),
        IpFamily::V6
    );
}

#[test]
fn rejected_config_is_returned() {
    let config: PoolConfig = serde_yaml::from_str("prefixes: [10.20.0.0/16, 10.20.0.0/17]").unwrap();
    let err = config.validate().unwrap_err();
    assert_eq!(err.errors, ["10.20.0.0/17 overlaps with 10.20.0.0/16"]);
    assert_eq!(err.rejected.prefixes.len(), 2);
}

#[test]
fn duplicates_rejected_by_default() {
    let config: PoolConfig = serde_yaml::from_str("prefixes: [10.20.0.0/16]").unwrap();
    let pool = PrefixPool::from_config(&config.validate().unwrap()).unwrap();
    pool.extract("c1", IpFamily::V4, &[]).unwrap();
    let err = pool.extract("c1", IpFamily::V4, &[]).unwrap_err();
    assert_eq!(err.kind, AllocErrorKind::DuplicateConnection);
}
