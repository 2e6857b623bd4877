//! Build determinism and randomized forest invariants.

mod fixtures;

use fixtures::catalogs::{halo, link_to, subhalo, try_build};
use halotree::{HaloCatalog, MergerTree, Snapshot, SubhaloType, TotalBaryon};
use proptest::prelude::*;

const TERMINAL: i32 = 10;

fn next(state: &mut u64) -> u64 {
    // xorshift64; the seed is forced odd so the sequence never collapses.
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

fn pick(state: &mut u64, bound: u64) -> u64 {
    next(state) % bound
}

/// A random forest: up to three disjoint trees of bounded depth, halos
/// merging within each tree, one or two subhalos per halo. Construction is
/// fully determined by the seed.
fn random_forest(seed: u64) -> (HaloCatalog, i32) {
    let mut rng = seed | 1;
    let mut catalog = HaloCatalog::new();
    let mut next_halo_id = 1u64;
    let mut next_sub_id = 10_000u64;
    let mut min_snapshot = TERMINAL;

    let tree_count = 1 + pick(&mut rng, 3);
    for _ in 0..tree_count {
        let depth = 1 + pick(&mut rng, 4) as i32;
        min_snapshot = min_snapshot.min(TERMINAL - depth + 1);

        // (halo id, first subhalo id) per halo of the previous level.
        let mut previous: Vec<(u64, u64)> = Vec::new();

        for level in 0..depth {
            let snapshot = TERMINAL - level;
            let halos_here = if level == 0 {
                1
            } else {
                1 + pick(&mut rng, 3) as usize
            };

            let mut current = Vec::with_capacity(halos_here);
            for _ in 0..halos_here {
                let halo_id = next_halo_id;
                next_halo_id += 1;
                let mvir = 0.5e12 + pick(&mut rng, 3_500) as f64 * 1.0e9;
                let h = catalog.add_halo(halo(halo_id, snapshot, mvir));

                let target = if level == 0 {
                    None
                } else {
                    let t = pick(&mut rng, previous.len() as u64) as usize;
                    Some(previous[t])
                };

                let subs_here = 1 + pick(&mut rng, 2) as usize;
                let mut first_sub_id = 0;
                for s in 0..subs_here {
                    let sub_id = next_sub_id;
                    next_sub_id += 1;
                    if s == 0 {
                        first_sub_id = sub_id;
                    }
                    let sub_mvir = 0.2e12 + pick(&mut rng, 2_000) as f64 * 1.0e9;
                    let mut sub = subhalo(sub_id, snapshot, sub_mvir);
                    if let Some((desc_halo, desc_sub)) = target {
                        link_to(&mut sub, desc_halo, desc_sub);
                    }
                    catalog.add_subhalo(h, sub);
                }

                current.push((halo_id, first_sub_id));
            }
            previous = current;
        }
    }

    (catalog, min_snapshot)
}

/// Observable state of a finished forest, for equality comparison.
fn fingerprint(trees: &[MergerTree], baryons: &TotalBaryon) -> Vec<String> {
    let mut lines = Vec::new();
    for tree in trees {
        for (snapshot, bucket) in tree.halos_by_snapshot() {
            for &halo_idx in bucket {
                let halo = tree.halo(halo_idx);
                let central = halo.central_subhalo().map(|c| tree.subhalo(c));
                lines.push(format!(
                    "tree={} snap={} halo={} mvir={:.6e} central={:?} accreted={:.6e} subs={}",
                    tree.id(),
                    snapshot,
                    halo.id,
                    halo.mvir,
                    central.map(|c| c.id.raw()),
                    central.map(|c| c.accreted_mass()).unwrap_or(0.0),
                    halo.subhalo_count(),
                ));
            }
        }
    }
    for (snapshot, total) in baryons.created() {
        lines.push(format!("baryons snap={snapshot} total={total:.6e}"));
    }
    lines
}

fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= 1e-9 * scale,
        "expected {expected}, got {actual}"
    );
}

fn check_invariants(trees: &[MergerTree], baryons: &TotalBaryon, min_snapshot: i32) {
    for tree in trees {
        for idx in tree.halo_handles() {
            let halo = tree.halo(idx);

            // Self-containment and membership.
            assert_eq!(halo.merger_tree(), Some(tree.id()));

            // Exactly one central per halo.
            let centrals = halo
                .all_subhalos()
                .filter(|&s| tree.subhalo(s).subhalo_type() == SubhaloType::Central)
                .count();
            assert_eq!(centrals, 1, "halo {}", halo.id);

            // Descendant edges cross exactly one snapshot boundary, and
            // enforced growth keeps masses monotonic along them.
            if let Some(desc) = halo.descendant() {
                assert_eq!(tree.halo(desc).snapshot, halo.snapshot.next());
                assert!(halo.mvir <= tree.halo(desc).mvir);
            }
            for sub_idx in halo.all_subhalos() {
                let sub = tree.subhalo(sub_idx);
                if let Some(desc) = sub.descendant() {
                    assert_eq!(tree.subhalo(desc).snapshot, sub.snapshot.next());
                }
            }

            // Accretion is never negative.
            let central = halo.central_subhalo().unwrap();
            assert!(tree.subhalo(central).accreted_mass() >= 0.0);
        }
    }

    // The global budget is the running sum of per-snapshot accretion.
    let mut expected = 0.0;
    for snapshot in min_snapshot..=TERMINAL {
        let snapshot = Snapshot::new(snapshot);
        for tree in trees {
            for &halo_idx in tree.halos_at(snapshot) {
                let central = tree.halo(halo_idx).central_subhalo().unwrap();
                expected += tree.subhalo(central).accreted_mass();
            }
        }
        assert_close(baryons.created_at(snapshot), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_forests_uphold_invariants(seed in any::<u64>()) {
        let (catalog, min_snapshot) = random_forest(seed);
        let (trees, baryons) =
            try_build(catalog, min_snapshot, TERMINAL, TERMINAL, 1).expect("build succeeds");
        check_invariants(&trees, &baryons, min_snapshot);
    }

    #[test]
    fn builds_are_deterministic_across_thread_counts(seed in any::<u64>()) {
        let (catalog, min_snapshot) = random_forest(seed);
        let (trees_serial, baryons_serial) =
            try_build(catalog, min_snapshot, TERMINAL, TERMINAL, 1).expect("serial build");

        let (catalog, _) = random_forest(seed);
        let (trees_parallel, baryons_parallel) =
            try_build(catalog, min_snapshot, TERMINAL, TERMINAL, 4).expect("parallel build");

        prop_assert_eq!(
            fingerprint(&trees_serial, &baryons_serial),
            fingerprint(&trees_parallel, &baryons_parallel)
        );
    }
}

#[test]
fn repeated_builds_on_identical_inputs_match() {
    let (catalog_a, min_snapshot) = random_forest(0xDEC0DE);
    let (catalog_b, _) = random_forest(0xDEC0DE);

    let (trees_a, baryons_a) =
        try_build(catalog_a, min_snapshot, TERMINAL, TERMINAL, 2).unwrap();
    let (trees_b, baryons_b) =
        try_build(catalog_b, min_snapshot, TERMINAL, TERMINAL, 2).unwrap();

    assert_eq!(
        fingerprint(&trees_a, &baryons_a),
        fingerprint(&trees_b, &baryons_b)
    );
}
