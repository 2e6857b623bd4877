//! Monotonic halo mass growth.

use crate::config::SimulationParams;
use crate::model::{MergerTree, Snapshot};

use super::error::BuildError;
use super::pool;

/// Make descendant halos at least as massive as each of their
/// progenitors, propagating mass forward in time. Snapshots must be
/// visited ascending within a tree: a mass raised at snapshot `s` has to
/// be visible when `s + 1` is compared against `s + 2`.
pub(crate) fn ensure_halo_mass_growth(
    threads: usize,
    trees: &mut [MergerTree],
    sim_params: &SimulationParams,
) -> Result<(), BuildError> {
    pool::for_each_tree(threads, trees, |tree| {
        for snapshot in
            Snapshot::range_inclusive(sim_params.min_snapshot, sim_params.max_snapshot.prev())
        {
            for halo_idx in tree.halos_at(snapshot).to_vec() {
                let (mvir, descendant) = {
                    let halo = tree.halo(halo_idx);
                    (halo.mvir, halo.descendant())
                };
                if let Some(descendant) = descendant {
                    if mvir > tree.halo(descendant).mvir {
                        tree.halo_mut(descendant).mvir = mvir;
                    }
                }
            }
        }
        Ok(())
    })
}
