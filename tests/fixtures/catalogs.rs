#![allow(dead_code)]

//! Catalog builders and build helpers shared by the integration tests.

use halotree::{
    BuildError, Cosmology, DescendantLink, ExecutionParams, GasCoolingParams, Halo, HaloCatalog,
    HaloId, HaloIdx, MergerTree, SimulationParams, Snapshot, Subhalo, SubhaloId, TotalBaryon,
    TreeBuilder,
};

pub fn halo(id: u64, snapshot: i32, mvir: f64) -> Halo {
    let mut halo = Halo::new(HaloId::new(id), Snapshot::new(snapshot));
    halo.mvir = mvir;
    halo.vvir = 100.0;
    halo
}

pub fn subhalo(id: u64, snapshot: i32, mvir: f64) -> Subhalo {
    let mut sub = Subhalo::new(SubhaloId::new(id), Snapshot::new(snapshot));
    sub.mvir = mvir;
    sub.vvir = 120.0;
    sub.lambda = 0.03;
    sub.concentration = 8.0;
    sub.position = [1.0, 2.0, 3.0];
    sub.velocity = [10.0, 20.0, 30.0];
    sub.l = [0.1, 0.2, 0.3];
    sub
}

/// Point a subhalo at its nominal descendant halo/subhalo pair.
pub fn link_to(sub: &mut Subhalo, halo_id: u64, subhalo_id: u64) {
    sub.descendant_link = Some(DescendantLink {
        halo_id: HaloId::new(halo_id),
        subhalo_id: SubhaloId::new(subhalo_id),
    });
}

pub fn sim(min: i32, max: i32) -> SimulationParams {
    SimulationParams {
        min_snapshot: Snapshot::new(min),
        max_snapshot: Snapshot::new(max),
    }
}

pub fn exec(terminal: i32) -> ExecutionParams {
    ExecutionParams {
        output_snapshots: vec![Snapshot::new(terminal)],
        ..ExecutionParams::default()
    }
}

pub fn universal_baryon_fraction() -> f64 {
    Cosmology::default().universal_baryon_fraction()
}

/// Run a full build with default execution flags.
pub fn try_build(
    catalog: HaloCatalog,
    min: i32,
    max: i32,
    terminal: i32,
    threads: usize,
) -> Result<(Vec<MergerTree>, TotalBaryon), BuildError> {
    try_build_with(catalog, exec(terminal), min, max, threads)
}

pub fn try_build_with(
    catalog: HaloCatalog,
    exec_params: ExecutionParams,
    min: i32,
    max: i32,
    threads: usize,
) -> Result<(Vec<MergerTree>, TotalBaryon), BuildError> {
    let mut baryons = TotalBaryon::new();
    let builder = TreeBuilder::new(exec_params, threads);
    let trees = builder.build(
        catalog,
        &sim(min, max),
        &GasCoolingParams::default(),
        &Cosmology::default(),
        &mut baryons,
    )?;
    Ok((trees, baryons))
}

pub fn build(
    catalog: HaloCatalog,
    min: i32,
    max: i32,
    terminal: i32,
    threads: usize,
) -> (Vec<MergerTree>, TotalBaryon) {
    try_build(catalog, min, max, terminal, threads).expect("build succeeds")
}

/// Locate a halo anywhere in the forest by raw id.
pub fn find_halo(trees: &[MergerTree], id: u64) -> (&MergerTree, HaloIdx) {
    for tree in trees {
        for idx in tree.halo_handles() {
            if tree.halo(idx).id == HaloId::new(id) {
                return (tree, idx);
            }
        }
    }
    panic!("halo {id} not found in any tree");
}

pub fn halo_ids(tree: &MergerTree) -> Vec<u64> {
    tree.halo_handles()
        .map(|idx| tree.halo(idx).id.raw())
        .collect()
}

/// Three halos in one chain across snapshots 0..=2, one subhalo each, with
/// masses growing toward the present.
pub fn linear_chain() -> HaloCatalog {
    let mut catalog = HaloCatalog::new();

    let h2 = catalog.add_halo(halo(102, 2, 3.0e12));
    catalog.add_subhalo(h2, subhalo(202, 2, 3.0e12));

    let h1 = catalog.add_halo(halo(101, 1, 2.0e12));
    let mut s1 = subhalo(201, 1, 2.0e12);
    link_to(&mut s1, 102, 202);
    s1.main_progenitor = true;
    catalog.add_subhalo(h1, s1);

    let h0 = catalog.add_halo(halo(100, 0, 1.0e12));
    let mut s0 = subhalo(200, 0, 1.0e12);
    link_to(&mut s0, 101, 201);
    s0.main_progenitor = true;
    catalog.add_subhalo(h0, s0);

    catalog
}

/// Two halos at snapshot 0 merging into one at snapshot 1. Neither
/// progenitor subhalo carries the main-progenitor flag.
pub fn merger() -> HaloCatalog {
    let mut catalog = HaloCatalog::new();

    let h1 = catalog.add_halo(halo(11, 1, 3.5e12));
    catalog.add_subhalo(h1, subhalo(21, 1, 3.5e12));

    let h0a = catalog.add_halo(halo(10, 0, 2.0e12));
    let mut sa = subhalo(20, 0, 2.0e12);
    link_to(&mut sa, 11, 21);
    catalog.add_subhalo(h0a, sa);

    let h0b = catalog.add_halo(halo(12, 0, 1.0e12));
    let mut sb = subhalo(22, 0, 1.0e12);
    link_to(&mut sb, 11, 21);
    catalog.add_subhalo(h0b, sb);

    catalog
}
