//! The serial linker: nominal descendant references become concrete edges.
//!
//! Snapshots are walked in descending order so that a descendant is always
//! linked (and assigned to a tree) before any of its progenitors. Within a
//! snapshot, halos follow catalog input order; this ordering is what makes
//! repeated builds reproducible.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::config::ExecutionParams;
use crate::model::{HaloCatalog, HaloId, HaloIdx, Snapshot, SubhaloIdx};

use super::error::{BuildError, InvalidData, SubhaloNotFound};
use super::TreeShell;

/// Resolve every subhalo's nominal descendant into bidirectional edges at
/// both halo and subhalo granularity, propagating tree membership backward
/// to progenitors. Halos whose subhalos resolve nowhere are pruned from
/// the id index, cutting off their entire progenitor branch.
pub(crate) fn link_catalog(
    catalog: &mut HaloCatalog,
    shells: &mut [TreeShell],
    exec_params: &ExecutionParams,
) -> Result<(), BuildError> {
    // Index halos by snapshot and by id.
    let mut halos_by_snapshot: BTreeMap<Snapshot, Vec<HaloIdx>> = BTreeMap::new();
    let mut halos_by_id: HashMap<HaloId, HaloIdx> = HashMap::new();
    for idx in catalog.halos_in_order().collect::<Vec<_>>() {
        let halo = catalog.halo(idx);
        halos_by_snapshot.entry(halo.snapshot).or_default().push(idx);
        halos_by_id.insert(halo.id, idx);
    }

    // Descending snapshots, minus the latest: those halos are the tree
    // roots and have nothing to link forward to.
    let snapshots: Vec<Snapshot> = halos_by_snapshot.keys().rev().skip(1).copied().collect();

    let started = Instant::now();
    for snapshot in snapshots {
        info!("linking halos/subhalos at snapshot {snapshot}");

        let mut ignored = 0usize;
        let bucket = &halos_by_snapshot[&snapshot];
        for &halo_idx in bucket {
            let halo_id = catalog.halo(halo_idx).id;
            let subhalos: Vec<SubhaloIdx> = catalog.halo(halo_idx).all_subhalos().collect();

            let mut halo_linked = false;
            let mut halo_dropped = false;
            for sub_idx in subhalos {
                let sub = catalog.subhalo(sub_idx);
                let (sub_id, sub_snapshot, sub_mvir) = (sub.id, sub.snapshot, sub.mvir);

                // A subhalo with no descendant is a dead end; drop it from
                // its host.
                let Some(nominal) = sub.descendant_link else {
                    debug!("subhalo {sub_id} has no descendant, not following");
                    catalog.detach_subhalo(halo_idx, sub_idx);
                    continue;
                };

                // An unresolvable descendant halo invalidates the whole
                // current halo: it is dropped from the id index so its
                // progenitors become unreachable, and its remaining
                // subhalos are not processed.
                let Some(&desc_halo_idx) = halos_by_id.get(&nominal.halo_id) else {
                    debug!(
                        "subhalo {sub_id} points to descendant halo/subhalo {}/{} which doesn't \
                         exist, ignoring halo {halo_id} and the rest of its progenitors",
                        nominal.halo_id, nominal.subhalo_id
                    );
                    halos_by_id.remove(&halo_id);
                    halo_dropped = true;
                    break;
                };

                let found = catalog
                    .halo(desc_halo_idx)
                    .all_subhalos()
                    .find(|&d| catalog.subhalo(d).id == nominal.subhalo_id);

                match found {
                    Some(desc_sub_idx) => {
                        // Only direct parentage is admitted: descendants
                        // live exactly one snapshot later.
                        let desc_sub = catalog.subhalo(desc_sub_idx);
                        if desc_sub.snapshot != sub_snapshot.next() {
                            return Err(InvalidData::NotDirectDescendant {
                                subhalo: sub_id,
                                snapshot: sub_snapshot,
                                descendant: desc_sub.id,
                                descendant_snapshot: desc_sub.snapshot,
                            }
                            .into());
                        }
                        link(catalog, shells, sub_idx, desc_sub_idx, halo_idx, desc_halo_idx)?;
                        halo_linked = true;
                    }
                    None => {
                        let err = SubhaloNotFound {
                            subhalo: sub_id,
                            mvir: sub_mvir,
                            descendant_id: nominal.subhalo_id,
                            descendant_halo: nominal.halo_id,
                        };
                        if !exec_params.skip_missing_descendants {
                            return Err(err.into());
                        }
                        if exec_params.warn_on_missing_descendants {
                            warn!("{err}, skipping");
                        }
                        catalog.detach_subhalo(halo_idx, sub_idx);
                    }
                }
            }

            if halo_dropped {
                ignored += 1;
            } else if !halo_linked {
                debug!(
                    "halo {halo_id} doesn't contain any subhalo pointing to descendants, \
                     ignoring it (and the rest of its progenitors)"
                );
                halos_by_id.remove(&halo_id);
                ignored += 1;
            }
        }

        let total = bucket.len();
        if total > 0 {
            debug!(
                "{ignored}/{total} ({:.2}%) halos ignored at snapshot {snapshot} due to missing \
                 descendants (they were either the last halo of their family line, or they only \
                 hosted subhalos that were the last of their subhalo families)",
                ignored as f64 * 100.0 / total as f64
            );
        }
    }

    info!("linked all halos/subhalos in {:.3?}", started.elapsed());
    Ok(())
}

/// Install edges for one resolved (parent, descendant) pair and propagate
/// tree membership. The descendant halo must already belong to a tree.
fn link(
    catalog: &mut HaloCatalog,
    shells: &mut [TreeShell],
    parent_sub: SubhaloIdx,
    desc_sub: SubhaloIdx,
    parent_halo: HaloIdx,
    desc_halo: HaloIdx,
) -> Result<(), BuildError> {
    trace!(
        "connecting subhalo {} as a parent of subhalo {}",
        catalog.subhalo(parent_sub).id,
        catalog.subhalo(desc_sub).id
    );

    // Subhalo-level edges. A subhalo never has two descendants.
    catalog.subhalo_mut(desc_sub).ascendants.push(parent_sub);
    if let Some(existing) = catalog.subhalo(parent_sub).descendant() {
        return Err(InvalidData::SubhaloDescendantTaken {
            subhalo: catalog.subhalo(parent_sub).id,
            existing: catalog.subhalo(existing).id,
            claimed: catalog.subhalo(desc_sub).id,
        }
        .into());
    }
    catalog.subhalo_mut(parent_sub).descendant = Some(desc_sub);

    // Halo-level edges. The ascendant set stays de-duplicated; a halo
    // never has two distinct descendants.
    let newly_linked = catalog.halo_mut(desc_halo).insert_ascendant(parent_halo);

    if let Some(existing) = catalog.halo(parent_halo).descendant() {
        if existing != desc_halo {
            return Err(InvalidData::HaloDescendantConflict {
                halo: catalog.halo(parent_halo).id,
                existing: catalog.halo(existing).id,
                claimed: catalog.halo(desc_halo).id,
            }
            .into());
        }
    }
    catalog.halo_mut(parent_halo).descendant = Some(desc_halo);

    // Descendants are linked before their progenitors, so the descendant
    // halo must already carry a tree.
    let Some(tree) = catalog.halo(desc_halo).merger_tree() else {
        return Err(InvalidData::UnassignedTree {
            halo: catalog.halo(desc_halo).id,
        }
        .into());
    };
    catalog.halo_mut(parent_halo).tree = Some(tree);
    if newly_linked {
        let snapshot = catalog.halo(parent_halo).snapshot;
        shells[tree.raw()].add_halo(snapshot, parent_halo);
    }

    Ok(())
}
