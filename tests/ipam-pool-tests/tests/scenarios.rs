use ipam::address::{IpFamily, IpPrefix};
use ipam::engine;
use ipam::errors::HasErrorKind;
use ipam::proto::{AllocErrorKind, ExtraPrefixRequest};
use ipam::PrefixPool;

fn prefixes(list: &[&str]) -> Vec<IpPrefix> {
    list.iter().map(|s| s.parse().unwrap()).collect()
}

#[test]
fn connection_round_trip() {
    ipam_logger::init_for_tests(&Default::default());

    let pool = PrefixPool::new(&["10.10.1.0/24"]).unwrap();
    let response = pool.extract("c1", IpFamily::V4, &[]).unwrap();
    assert_eq!(response.src_address.to_string(), "10.10.1.1/30");
    assert_eq!(response.dst_address.to_string(), "10.10.1.2/30");

    pool.release("c1").unwrap();
    assert_eq!(pool.get_prefixes(), ["10.10.1.0/24"]);
}

#[test]
fn split_keeps_the_lower_half() {
    let (carved, remaining) =
        engine::extract_prefix(&prefixes(&["10.10.1.0/24"]), IpFamily::V4, 26).unwrap();
    assert_eq!(carved.to_string(), "10.10.1.0/26");
    assert_eq!(remaining, prefixes(&["10.10.1.64/26", "10.10.1.128/25"]));
}

#[test]
fn unaligned_release_merges() {
    let merged = engine::release_prefixes(&["10.10.1.0/25"], &["10.10.1.127/25"]).unwrap();
    assert_eq!(merged, prefixes(&["10.10.1.0/24"]));
}

#[test]
fn ipv6_batch() {
    let request = ExtraPrefixRequest::new(IpFamily::V6, 128)
        .with_required(100)
        .with_requested(200);
    let (carved, remaining) =
        engine::extract_prefixes(&prefixes(&["100::/64"]), &[request]).unwrap();
    assert_eq!(carved.len(), 200);
    assert_eq!(remaining.len(), 59);

    let restored = engine::release_prefixes(&remaining, &carved).unwrap();
    assert_eq!(restored, prefixes(&["100::/64"]));
}

#[test]
fn splitting_never_widens() {
    let pool = prefixes(&["10.10.1.0/24"]);
    let err = engine::extract_prefix(&pool, IpFamily::V4, 23).unwrap_err();
    assert_eq!(err.kind(), AllocErrorKind::NoRoomForPrefix);
}

#[test]
fn exact_fit_is_preferred() {
    let pool = prefixes(&["10.10.0.0/16", "10.20.0.0/24", "10.30.0.0/20"]);
    let (carved, remaining) = engine::extract_prefix(&pool, IpFamily::V4, 24).unwrap();
    assert_eq!(carved.to_string(), "10.20.0.0/24");
    assert_eq!(remaining, prefixes(&["10.10.0.0/16", "10.30.0.0/20"]));
}

#[test]
fn exclusions_while_connections_are_live() {
    let pool = PrefixPool::new(&["10.20.0.0/16"]).unwrap();
    pool.extract("c1", IpFamily::V4, &[]).unwrap();

    let excluded = pool.exclude_prefixes(&["10.20.1.10/24", "10.20.32.0/19"]).unwrap();
    assert!(!pool.intersect("10.20.1.0/24").unwrap());
    assert!(!pool.intersect("10.20.32.0/19").unwrap());

    let response = pool.extract("c2", IpFamily::V4, &[]).unwrap();
    assert_eq!(response.src_address.to_string(), "10.20.0.5/30");

    pool.release_excluded_prefixes(&excluded).unwrap();
    pool.release("c1").unwrap();
    pool.release("c2").unwrap();
    assert_eq!(pool.get_prefixes(), ["10.20.0.0/16"]);
}

#[test]
fn mixed_families() {
    let pool = PrefixPool::new(&["10.10.1.0/24", "fd00::/120"]).unwrap();
    let requests = [
        ExtraPrefixRequest::new(IpFamily::V4, 28),
        ExtraPrefixRequest::new(IpFamily::V6, 124).with_requested(2),
    ];
    let response = pool.extract("c1", IpFamily::V6, &requests).unwrap();
    assert_eq!(response.src_address.to_string(), "fd00::1/126");
    assert_eq!(
        response
            .extra_prefixes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        ["10.10.1.0/28", "fd00::10/124", "fd00::20/124"]
    );

    pool.release("c1").unwrap();
    assert_eq!(pool.get_prefixes(), ["10.10.1.0/24", "fd00::/120"]);
}
