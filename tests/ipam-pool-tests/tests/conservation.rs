use std::collections::BTreeSet;

use ipam::address::{IpFamily, IpPrefix};
use ipam::engine;
use ipam::proto::{AllocErrorKind, ExtraPrefixRequest};
use ipam::PrefixPool;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

#[test_case(&["10.10.0.0/22"], 1 ; "ipv4 single block")]
#[test_case(&["10.10.0.0/24", "10.10.4.0/23", "172.16.0.0/26"], 2 ; "ipv4 scattered")]
#[test_case(&["10.10.0.0/24", "fd00::/118"], 3 ; "dual stack")]
#[test_case(&["fd00::/116"], 4 ; "ipv6 only")]
fn random_walk(base: &[&str], seed: u64) {
    ipam_logger::init_for_tests(&Default::default());

    let pool = PrefixPool::new(base).unwrap();
    let families = pool
        .base_prefixes()
        .iter()
        .map(IpPrefix::family)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    let total = IpPrefix::total_address_count(pool.base_prefixes());

    let mut rng = StdRng::seed_from_u64(seed);
    let mut live = Vec::<String>::new();

    for step in 0..600 {
        if live.is_empty() || rng.random_bool(0.6) {
            let id = format!("c{}", step);
            let family = families[rng.random_range(0..families.len())];
            let extra = if rng.random_bool(0.3) {
                let len = rng.random_range(family.bits() - 5..=family.bits());
                vec![ExtraPrefixRequest::new(family, len).with_requested(rng.random_range(1..=3))]
            } else {
                vec![]
            };
            match pool.extract(id.as_str(), family, &extra) {
                Ok(_) => live.push(id),
                Err(reason) => assert_eq!(reason.kind, AllocErrorKind::NoRoomForPrefix),
            }
        } else {
            let id = live.swap_remove(rng.random_range(0..live.len()));
            pool.release(&id).unwrap();
        }

        let snapshot = pool.snapshot();
        assert!(snapshot.is_conserved(), "step #{}", step);
        assert_eq!(
            snapshot.free_address_count() + snapshot.leased_address_count(),
            total
        );

        let everything = snapshot
            .prefixes
            .iter()
            .chain(snapshot.connections.values().flat_map(|c| c.prefixes()))
            .copied()
            .collect::<Vec<_>>();
        engine::check_disjoint(&everything).unwrap();
    }

    for id in live {
        pool.release(&id).unwrap();
    }
    let mut base = pool.base_prefixes().to_vec();
    base.sort();
    assert_eq!(pool.prefixes(), base);
}

/// A random aligned block somewhere inside one of the base prefixes.
fn random_block_within(rng: &mut StdRng, base: &[IpPrefix]) -> IpPrefix {
    let within = base[rng.random_range(0..base.len())];
    let family = within.family();
    let len = rng.random_range(within.len()..=(within.len() + 6).min(family.bits()));
    let offset = rng.random_range(0..1u128 << (len - within.len())) << (family.bits() - len);
    IpPrefix::from_bits(within.network_bits() | offset, family, len).unwrap()
}

#[test_case(&["10.10.0.0/22"], 5 ; "ipv4 single block")]
#[test_case(&["10.10.0.0/24", "10.10.4.0/23", "172.16.0.0/26"], 6 ; "ipv4 scattered")]
#[test_case(&["10.10.0.0/24", "fd00::/118"], 7 ; "dual stack")]
fn random_walk_with_exclusions(base: &[&str], seed: u64) {
    ipam_logger::init_for_tests(&Default::default());

    let pool = PrefixPool::new(base).unwrap();
    let base = pool.base_prefixes().to_vec();
    let families = base
        .iter()
        .map(IpPrefix::family)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut live = Vec::<String>::new();

    for step in 0..600 {
        match rng.random_range(0..10) {
            0 => {
                let excluded = random_block_within(&mut rng, &base);
                if let Err(reason) = pool.exclude_prefixes(&[excluded]) {
                    assert_eq!(reason.kind, AllocErrorKind::PoolExhausted);
                }
            },
            1 => {
                let excluded = pool.excluded_prefixes();
                if !excluded.is_empty() {
                    let block = excluded[rng.random_range(0..excluded.len())];
                    pool.release_excluded_prefixes(&[block]).unwrap();
                }
            },
            2..=4 if !live.is_empty() => {
                let id = live.swap_remove(rng.random_range(0..live.len()));
                pool.release(&id).unwrap();
            },
            _ => {
                let id = format!("c{}", step);
                let family = families[rng.random_range(0..families.len())];
                match pool.extract(id.as_str(), family, &[]) {
                    Ok(response) => {
                        for excluded in pool.excluded_prefixes() {
                            assert!(
                                !excluded.contains_address(response.src_address.address),
                                "step #{}: {} handed out inside {}",
                                step,
                                response.src_address,
                                excluded
                            );
                        }
                        live.push(id);
                    },
                    Err(reason) => assert_eq!(reason.kind, AllocErrorKind::NoRoomForPrefix),
                }
            },
        }

        let snapshot = pool.snapshot();
        assert!(snapshot.is_conserved(), "step #{}", step);

        let everything = snapshot
            .prefixes
            .iter()
            .chain(&snapshot.excluded)
            .chain(snapshot.connections.values().flat_map(|c| c.prefixes()))
            .copied()
            .collect::<Vec<_>>();
        engine::check_disjoint(&everything).unwrap();
    }

    for id in live {
        pool.release(&id).unwrap();
    }
    pool.release_excluded_prefixes(&pool.excluded_prefixes()).unwrap();
    let mut base = base;
    base.sort();
    assert_eq!(pool.prefixes(), base);
}

#[test]
fn exhaustion_and_recovery() {
    let pool = PrefixPool::new(&["10.10.1.0/28"]).unwrap();
    for i in 0..4 {
        pool.extract(format!("c{}", i), IpFamily::V4, &[]).unwrap();
    }
    let err = pool.extract("c4", IpFamily::V4, &[]).unwrap_err();
    assert_eq!(err.kind, AllocErrorKind::NoRoomForPrefix);
    assert!(pool.get_prefixes().is_empty());
    assert_eq!(pool.free_address_count(), 0);

    pool.release("c2").unwrap();
    let response = pool.extract("c4", IpFamily::V4, &[]).unwrap();
    assert_eq!(response.src_address.to_string(), "10.10.1.9/30");
}
