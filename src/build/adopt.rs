//! Tree adoption: moving linked halos out of the staging catalog.
//!
//! After linking, every halo that reached a tree is moved (with its
//! subhalos) into that tree's private arenas and every stored handle is
//! rewritten into the tree-local address space. Entities that never
//! reached a tree are pruned branches; they stay behind and drop with the
//! catalog.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Halo, HaloCatalog, HaloIdx, MergerTree, Snapshot, Subhalo, SubhaloIdx, TreeId};

use super::error::{BuildError, InvalidData};
use super::TreeShell;

pub(crate) fn adopt_trees(
    mut catalog: HaloCatalog,
    shells: Vec<TreeShell>,
) -> Result<Vec<MergerTree>, BuildError> {
    let mut trees = Vec::with_capacity(shells.len());

    for shell in shells {
        let tree_id = shell.id;
        let mut halos: Vec<Halo> = Vec::new();
        let mut subhalos: Vec<Subhalo> = Vec::new();
        let mut halos_by_snapshot: BTreeMap<Snapshot, Vec<HaloIdx>> = BTreeMap::new();
        let mut halo_map: HashMap<HaloIdx, HaloIdx> = HashMap::new();
        let mut sub_map: HashMap<SubhaloIdx, SubhaloIdx> = HashMap::new();

        // Move entities. Trees are disjoint, so a slot vacated by an
        // earlier tree can only mean a corrupted link graph.
        for (snapshot, slots) in shell.halos_by_snapshot {
            let bucket = halos_by_snapshot.entry(snapshot).or_default();
            for slot in slots {
                let halo = catalog.take_halo(slot).ok_or(InvalidData::DanglingHandle {
                    entity: "halo",
                    tree: tree_id,
                })?;
                let local = HaloIdx::new(halos.len());
                halo_map.insert(slot, local);

                for sub_slot in halo.all_subhalos() {
                    let sub =
                        catalog
                            .take_subhalo(sub_slot)
                            .ok_or(InvalidData::DanglingHandle {
                                entity: "subhalo",
                                tree: tree_id,
                            })?;
                    sub_map.insert(sub_slot, SubhaloIdx::new(subhalos.len()));
                    subhalos.push(sub);
                }

                halos.push(halo);
                bucket.push(local);
            }
        }

        // Rewrite handles into the tree-local address space.
        for halo in &mut halos {
            for asc in &mut halo.ascendants {
                *asc = remap_halo(&halo_map, *asc, tree_id)?;
            }
            if let Some(desc) = halo.descendant {
                halo.descendant = Some(remap_halo(&halo_map, desc, tree_id)?);
            }
            if let Some(central) = halo.central_subhalo {
                halo.central_subhalo = Some(remap_subhalo(&sub_map, central, tree_id)?);
            }
            for sat in &mut halo.satellite_subhalos {
                *sat = remap_subhalo(&sub_map, *sat, tree_id)?;
            }
        }
        for sub in &mut subhalos {
            sub.host = remap_halo(&halo_map, sub.host, tree_id)?;
            for asc in &mut sub.ascendants {
                *asc = remap_subhalo(&sub_map, *asc, tree_id)?;
            }
            if let Some(desc) = sub.descendant {
                sub.descendant = Some(remap_subhalo(&sub_map, desc, tree_id)?);
            }
        }

        trees.push(MergerTree::from_parts(
            tree_id,
            halos,
            subhalos,
            halos_by_snapshot,
        ));
    }

    Ok(trees)
}

fn remap_halo(
    map: &HashMap<HaloIdx, HaloIdx>,
    slot: HaloIdx,
    tree: TreeId,
) -> Result<HaloIdx, BuildError> {
    map.get(&slot).copied().ok_or_else(|| {
        InvalidData::DanglingHandle {
            entity: "halo",
            tree,
        }
        .into()
    })
}

fn remap_subhalo(
    map: &HashMap<SubhaloIdx, SubhaloIdx>,
    slot: SubhaloIdx,
    tree: TreeId,
) -> Result<SubhaloIdx, BuildError> {
    map.get(&slot).copied().ok_or_else(|| {
        InvalidData::DanglingHandle {
            entity: "subhalo",
            tree,
        }
        .into()
    })
}
