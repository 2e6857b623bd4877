//! Baryonic accretion from dark-matter growth.

use crate::config::{GasCoolingParams, SimulationParams};
use crate::cosmology::Cosmology;
use crate::model::{MergerTree, Snapshot, TotalBaryon};

use super::error::{BuildError, InvalidData};
use super::pool;

/// Phase A assigns every halo's central subhalo the baryonic mass accreted
/// since its progenitors, independently across trees. Phase B then
/// accumulates the global budget in strict ascending snapshot order.
///
/// The fractional accretion cap in the gas cooling parameters is currently
/// disabled; the struct is carried through for when it is re-enabled.
pub(crate) fn define_accretion_rates(
    threads: usize,
    trees: &mut [MergerTree],
    sim_params: &SimulationParams,
    _gas_cooling_params: &GasCoolingParams,
    cosmology: &Cosmology,
    all_baryons: &mut TotalBaryon,
) -> Result<(), BuildError> {
    let baryon_fraction = cosmology.universal_baryon_fraction();

    pool::for_each_tree(threads, trees, |tree| {
        for snapshot in
            Snapshot::range_inclusive(sim_params.min_snapshot, sim_params.max_snapshot).rev()
        {
            for halo_idx in tree.halos_at(snapshot).to_vec() {
                let (halo_id, growth, central) = {
                    let halo = tree.halo(halo_idx);
                    let ascendant_mass: f64 = halo
                        .ascendants()
                        .iter()
                        .map(|&asc| tree.halo(asc).mvir)
                        .sum();
                    (halo.id, halo.mvir - ascendant_mass, halo.central_subhalo())
                };
                let Some(central) = central else {
                    return Err(InvalidData::MissingCentral { halo: halo_id }.into());
                };

                // Baryons follow the dark matter the halo gained over its
                // progenitors; negative growth accretes nothing.
                tree.subhalo_mut(central).accreted_mass = (growth * baryon_fraction).max(0.0);
            }
        }
        Ok(())
    })?;

    // Global budget, accumulated from the earliest snapshot.
    all_baryons.zero_fill(sim_params.min_snapshot, sim_params.max_snapshot);
    let mut total = 0.0;
    for snapshot in Snapshot::range_inclusive(sim_params.min_snapshot, sim_params.max_snapshot) {
        for tree in trees.iter() {
            for &halo_idx in tree.halos_at(snapshot) {
                let halo = tree.halo(halo_idx);
                let Some(central) = halo.central_subhalo() else {
                    return Err(InvalidData::MissingCentral { halo: halo.id }.into());
                };
                total += tree.subhalo(central).accreted_mass();
            }
        }
        all_baryons.record_created(snapshot, total);
    }

    Ok(())
}
