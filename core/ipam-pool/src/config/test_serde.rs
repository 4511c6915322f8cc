use test_case::test_case;

use crate::config::*;

#[test_case(
    PoolConfig {
        prefixes: vec!["10.20.0.0/16".into()],
        ..Default::default()
    },
    r#"
        prefixes:
          - 10.20.0.0/16
    "#
    ; "defaults"
)]
#[test_case(
    PoolConfig {
        prefixes: vec!["10.20.0.0/16".into(), "100::/64".into()],
        excluded_prefixes: vec!["10.20.1.0/24".into()],
        on_duplicate_connection: DuplicatePolicy::Replace,
    },
    r#"
        prefixes: [10.20.0.0/16, "100::/64"]
        excluded_prefixes: [10.20.1.0/24]
        on_duplicate_connection: replace
    "#
    ; "everything set"
)]
#[test_case(
    PoolConfig {
        prefixes: vec!["10.20.0.0/16".into()],
        on_duplicate_connection: DuplicatePolicy::Reject,
        ..Default::default()
    },
    r#"
        prefixes: [10.20.0.0/16]
        on_duplicate_connection: reject
    "#
    ; "explicit reject"
)]
fn test_serde(expected: PoolConfig, yaml: &str) {
    let actual: PoolConfig = serde_yaml::from_str(yaml).expect("serde_yaml::from_str");
    assert_eq!(actual, expected);
}

#[test]
fn unknown_policy() {
    assert!(
        serde_yaml::from_str::<PoolConfig>(
            r#"
            prefixes: [10.20.0.0/16]
            on_duplicate_connection: leak
            "#
        )
        .is_err()
    );
}
