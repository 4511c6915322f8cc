use test_case::test_case;

use crate::config::*;

#[test_case(
    r#"
    prefixes: [10.20.0.0/16]
    "#,
    &[]
    ; "a single prefix"
)]
#[test_case(
    r#"
    prefixes: [10.20.0.0/16, "100::/64"]
    excluded_prefixes: [10.20.1.10/24, 10.32.0.0/16]
    on_duplicate_connection: replace
    "#,
    &[]
    ; "exclusions, some of them outside"
)]
#[test_case(
    r#"
    prefixes: []
    "#,
    &["at least one prefix must be defined"]
    ; "no prefixes"
)]
#[test_case(
    r#"
    prefixes: [10.20.0.0/16, 10.20.1.0/24, 10.30.0.0/16]
    "#,
    &["10.20.1.0/24 overlaps with 10.20.0.0/16"]
    ; "overlapping prefixes"
)]
#[test_case(
    r#"
    prefixes: [10.20.0.0, 10.20.0.0/33]
    excluded_prefixes: [nope/8]
    "#,
    &[
        r#"prefixes[0]: no slash in "10.20.0.0""#,
        r#"prefixes[1]: bad prefix length in "10.20.0.0/33" << invalid prefix length /33 for IPv4"#,
        r#"excluded_prefixes[0]: bad address in "nope/8" << invalid IP address syntax"#,
    ]
    ; "malformed prefixes"
)]
#[test_case(
    r#"
    prefixes: [10.20.0.0/24]
    excluded_prefixes: [10.20.1.0/16]
    "#,
    &["excluded prefixes leave nothing to allocate"]
    ; "everything excluded"
)]
fn test_validation(yaml: &str, expected: &[&str]) {
    let actual_errors = serde_yaml::from_str::<PoolConfig>(yaml)
        .expect("invalid format")
        .validate()
        .err()
        .into_iter()
        .flat_map(|e| e.errors)
        .collect::<Vec<_>>();
    assert_eq!(actual_errors, expected);
}

#[test]
fn exclusions_from_a_list() {
    let config = PoolConfig {
        prefixes: vec!["10.20.0.0/16".into()],
        excluded_prefixes: vec!["10.20.1.0/24".into()],
        ..Default::default()
    }
    .with_exclusions_from(" 10.20.2.0/24,, 10.20.3.0/24 ,");
    assert_eq!(
        config.excluded_prefixes,
        ["10.20.1.0/24", "10.20.2.0/24", "10.20.3.0/24"]
    );

    let pool = PrefixPool::from_config(&config.validate().unwrap()).unwrap();
    assert!(!pool.intersect("10.20.2.0/24").unwrap());
    assert!(pool.intersect("10.20.4.0/24").unwrap());
}

#[test]
fn malformed_exclusion_from_a_list() {
    let errors = PoolConfig {
        prefixes: vec!["10.20.0.0/16".into()],
        ..Default::default()
    }
    .with_exclusions_from("10.20.1.0/24,10.20.2.0")
    .validate()
    .unwrap_err()
    .errors;
    assert_eq!(errors, [r#"excluded_prefixes[1]: no slash in "10.20.2.0""#]);
}

#[test]
fn every_error_is_listed_as_a_bullet() {
    let err = PoolConfig {
        prefixes: vec!["10.20.0.0".into(), "10.20.0.0/33".into()],
        ..Default::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error:\n\
         - prefixes[0]: no slash in \"10.20.0.0\"\n\
         - prefixes[1]: bad prefix length in \"10.20.0.0/33\" << invalid prefix length /33 for IPv4"
    );
}

#[test]
fn pool_from_config() {
    let config: PoolConfig = serde_yaml::from_str(
        r#"
        prefixes: [10.20.0.0/16]
        excluded_prefixes: [10.20.1.10/24, 10.20.32.0/19]
        on_duplicate_connection: replace
        "#,
    )
    .unwrap();
    let pool = PrefixPool::from_config(&config.validate().unwrap()).unwrap();
    assert_eq!(pool.duplicate_policy(), DuplicatePolicy::Replace);
    assert_eq!(pool.get_prefixes().len(), 7);
    assert_eq!(pool.base_prefixes().len(), 1);
}
