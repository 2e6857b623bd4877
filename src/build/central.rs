//! Central-subhalo definition along main-progenitor branches.
//!
//! Pass 1 walks each tree from late to early snapshots, promoting one
//! subhalo per halo to central: the first listed subhalo for halos whose
//! branch starts here, then the main progenitor at every step backward.
//! The snapshot order is a correctness requirement; a branch must be
//! promoted at its descendant end before its progenitors are visited.
//! Pass 2 validates that every halo ended up with exactly one central.

use tracing::warn;

use crate::config::SimulationParams;
use crate::model::{HaloIdx, MergerTree, Snapshot, SubhaloIdx, SubhaloType};

use super::error::{BuildError, InvalidArgument, InvalidData};
use super::pool;

pub(crate) fn define_central_subhalos(
    threads: usize,
    trees: &mut [MergerTree],
    sim_params: &SimulationParams,
) -> Result<(), BuildError> {
    pool::for_each_tree(threads, trees, |tree| {
        define_centrals_in_tree(tree, sim_params)
    })?;
    pool::for_each_tree(threads, trees, |tree| {
        validate_centrals_in_tree(tree, sim_params)
    })
}

fn define_centrals_in_tree(
    tree: &mut MergerTree,
    sim_params: &SimulationParams,
) -> Result<(), BuildError> {
    for snapshot in
        Snapshot::range_inclusive(sim_params.min_snapshot, sim_params.max_snapshot).rev()
    {
        for halo_idx in tree.halos_at(snapshot).to_vec() {
            if tree.halo(halo_idx).central_subhalo().is_some() {
                continue;
            }

            let Some(first) = tree.halo(halo_idx).all_subhalos().next() else {
                let halo = tree.halo(halo_idx);
                return Err(InvalidData::NoSubhalos {
                    halo: halo.id,
                    snapshot: halo.snapshot,
                }
                .into());
            };
            let mut subhalo = define_central_subhalo(tree, halo_idx, first)?;

            // Walk backward through history:
            //  * find the main progenitor of this subhalo and its host halo
            //  * promote it to central of that halo (if none defined yet)
            //  * stamp last_snapshot_identified on the non-main ascendants
            //  * repeat from the main progenitor
            loop {
                let ascendants = tree.subhalo(subhalo).ascendants().to_vec();
                if ascendants.is_empty() {
                    break;
                }

                let main = find_or_declare_main_progenitor(tree, subhalo, &ascendants);

                // A central on the ascendant halo means its whole branch
                // was already processed through another path.
                let ascendant_halo = tree.subhalo(main).host_halo();
                if tree.halo(ascendant_halo).central_subhalo().is_some() {
                    break;
                }

                let promoted = define_central_subhalo(tree, ascendant_halo, main)?;

                for &asc in &ascendants {
                    if !tree.subhalo(asc).main_progenitor {
                        let own = tree.subhalo(asc).snapshot;
                        tree.subhalo_mut(asc).last_snapshot_identified = Some(own);
                    }
                }

                subhalo = promoted;
            }
        }
    }
    Ok(())
}

/// The ascendant flagged as main progenitor; when none is, the most
/// massive ascendant is declared to be it (ties keep the first seen).
fn find_or_declare_main_progenitor(
    tree: &mut MergerTree,
    subhalo: SubhaloIdx,
    ascendants: &[SubhaloIdx],
) -> SubhaloIdx {
    if let Some(main) = ascendants
        .iter()
        .copied()
        .find(|&asc| tree.subhalo(asc).main_progenitor)
    {
        return main;
    }

    let mut best = ascendants[0];
    for &asc in &ascendants[1..] {
        if tree.subhalo(asc).mvir > tree.subhalo(best).mvir {
            best = asc;
        }
    }
    tree.subhalo_mut(best).main_progenitor = true;
    warn!(
        "no main progenitor defined for subhalo {}, defined subhalo {} based on its Mvir",
        tree.subhalo(subhalo).id,
        tree.subhalo(best).id
    );
    best
}

/// Promote a subhalo to central of its halo, adopting its kinematic state
/// as the halo's.
fn define_central_subhalo(
    tree: &mut MergerTree,
    halo_idx: HaloIdx,
    sub_idx: SubhaloIdx,
) -> Result<SubhaloIdx, BuildError> {
    let (position, velocity, concentration, lambda, sub_vvir, sub_id) = {
        let sub = tree.subhalo(sub_idx);
        (
            sub.position,
            sub.velocity,
            sub.concentration,
            sub.lambda,
            sub.vvir,
            sub.id,
        )
    };

    let halo = tree.halo_mut(halo_idx);
    halo.central_subhalo = Some(sub_idx);
    halo.position = position;
    halo.velocity = velocity;
    halo.concentration = concentration;
    halo.lambda = lambda;

    // The halo virial velocity is derived from total mass and redshift;
    // the subhalo one is measured directly by the halo finder. Keep the
    // measured value when it is larger.
    if halo.vvir < sub_vvir {
        halo.vvir = sub_vvir;
    }

    if !halo.remove_satellite(sub_idx) {
        return Err(InvalidData::NotASatellite {
            halo: halo.id,
            subhalo: sub_id,
        }
        .into());
    }

    tree.subhalo_mut(sub_idx).subhalo_type = SubhaloType::Central;
    Ok(sub_idx)
}

fn validate_centrals_in_tree(
    tree: &mut MergerTree,
    sim_params: &SimulationParams,
) -> Result<(), BuildError> {
    for snapshot in Snapshot::range_inclusive(sim_params.min_snapshot, sim_params.max_snapshot) {
        for &halo_idx in tree.halos_at(snapshot) {
            let halo = tree.halo(halo_idx);
            let mut centrals = 0usize;
            for sub in halo.all_subhalos() {
                if tree.subhalo(sub).subhalo_type() == SubhaloType::Central {
                    centrals += 1;
                    if centrals > 1 {
                        return Err(InvalidArgument::MultipleCentralSubhalos {
                            halo: halo.id,
                            snapshot,
                        }
                        .into());
                    }
                }
            }
            if centrals == 0 {
                return Err(InvalidArgument::NoCentralSubhalo {
                    halo: halo.id,
                    snapshot,
                }
                .into());
            }
        }
    }
    Ok(())
}
