//! The tree builder: a fixed pipeline from a halo catalog to a forest of
//! merger trees.
//!
//! Stage order is seed, link, adopt, verify, (mass growth), central
//! definition, accretion. The seeder and linker are serial; every later
//! stage runs one worker task per tree. Any invariant violation aborts the
//! whole build and the caller receives no trees.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::{ExecutionParams, GasCoolingParams, SimulationParams};
use crate::cosmology::Cosmology;
use crate::model::{HaloCatalog, HaloIdx, MergerTree, Snapshot, TotalBaryon, TreeId};

mod accretion;
mod adopt;
mod central;
mod error;
mod growth;
mod link;
mod pool;

pub use error::{BuildError, ErrorKind, InvalidArgument, InvalidData, SubhaloNotFound};

/// Tree membership accumulated during seeding and linking, keyed by
/// catalog handles. Adoption turns each shell into an owning
/// [`MergerTree`].
pub(crate) struct TreeShell {
    pub(crate) id: TreeId,
    pub(crate) halos_by_snapshot: BTreeMap<Snapshot, Vec<HaloIdx>>,
}

impl TreeShell {
    fn new(id: TreeId) -> Self {
        Self {
            id,
            halos_by_snapshot: BTreeMap::new(),
        }
    }

    pub(crate) fn add_halo(&mut self, snapshot: Snapshot, halo: HaloIdx) {
        self.halos_by_snapshot.entry(snapshot).or_default().push(halo);
    }
}

/// Builds merger trees from ingested halo catalogs.
pub struct TreeBuilder {
    exec_params: ExecutionParams,
    threads: usize,
}

impl TreeBuilder {
    /// A builder running with at most `threads` parallel workers over
    /// trees. A thread count of zero is treated as one.
    pub fn new(exec_params: ExecutionParams, threads: usize) -> Self {
        Self {
            exec_params,
            threads: threads.max(1),
        }
    }

    pub fn exec_params(&self) -> &ExecutionParams {
        &self.exec_params
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Assemble the merger forest. Consumes the catalog: halos that reach
    /// a tree move into it, pruned branches are dropped.
    pub fn build(
        &self,
        mut catalog: HaloCatalog,
        sim_params: &SimulationParams,
        gas_cooling_params: &GasCoolingParams,
        cosmology: &Cosmology,
        all_baryons: &mut TotalBaryon,
    ) -> Result<Vec<MergerTree>, BuildError> {
        let Some(terminal) = self.exec_params.terminal_snapshot() else {
            return Err(InvalidData::NoOutputSnapshots.into());
        };

        let mut shells = self.seed_trees(&mut catalog, terminal)?;

        link::link_catalog(&mut catalog, &mut shells, &self.exec_params)?;

        let mut trees = adopt::adopt_trees(catalog, shells)?;

        self.ensure_trees_are_self_contained(&mut trees)?;

        if self.exec_params.ensure_mass_growth {
            info!("making sure halos only grow in mass");
            growth::ensure_halo_mass_growth(self.threads, &mut trees, sim_params)?;
        }

        info!("defining central subhalos");
        central::define_central_subhalos(self.threads, &mut trees, sim_params)?;

        info!("defining accretion rates from dark matter growth");
        accretion::define_accretion_rates(
            self.threads,
            &mut trees,
            sim_params,
            gas_cooling_params,
            cosmology,
            all_baryons,
        )?;

        Ok(trees)
    }

    /// One tree per halo at the terminal snapshot, in catalog input order.
    fn seed_trees(
        &self,
        catalog: &mut HaloCatalog,
        terminal: Snapshot,
    ) -> Result<Vec<TreeShell>, BuildError> {
        let mut shells = Vec::new();
        for halo_idx in catalog.halos_in_order().collect::<Vec<_>>() {
            if catalog.halo(halo_idx).snapshot != terminal {
                continue;
            }
            let id = TreeId::new(shells.len());
            debug!(
                "creating merger tree {id} at halo {}",
                catalog.halo(halo_idx).id
            );
            catalog.halo_mut(halo_idx).tree = Some(id);
            let mut shell = TreeShell::new(id);
            shell.add_halo(terminal, halo_idx);
            shells.push(shell);
        }

        if shells.is_empty() {
            return Err(InvalidData::NoRootHalos {
                terminal,
                configured: self.exec_params.output_snapshots.clone(),
                observed: catalog.snapshots_present(),
            }
            .into());
        }
        Ok(shells)
    }

    /// Every halo reachable from a tree must carry that tree's id.
    fn ensure_trees_are_self_contained(
        &self,
        trees: &mut [MergerTree],
    ) -> Result<(), BuildError> {
        pool::for_each_tree(self.threads, trees, |tree| {
            let id = tree.id();
            for (_, bucket) in tree.halos_by_snapshot() {
                for &halo_idx in bucket {
                    let halo = tree.halo(halo_idx);
                    if halo.merger_tree() != Some(id) {
                        return Err(InvalidData::ForeignHalo {
                            halo: halo.id,
                            tree: id,
                        }
                        .into());
                    }
                }
            }
            Ok(())
        })
    }
}
