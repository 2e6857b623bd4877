//! Assembling a halo catalog from column datasets.
//!
//! The columns are laid out the way snapshot readers produce them: one
//! `halos` group and one `subhalos` group, each holding parallel arrays
//! indexed by entity. Subhalos attach to their host by id; hosts must
//! appear in the `halos` group.

use std::collections::HashMap;

use crate::model::{
    DescendantLink, Halo, HaloCatalog, HaloId, HaloIdx, Snapshot, Subhalo, SubhaloId, Vec3,
};

use super::{DatasetStore, IngestError};

/// Read the `halos` and `subhalos` column groups into a staging catalog.
pub fn load_catalog(store: &DatasetStore) -> Result<HaloCatalog, IngestError> {
    let mut catalog = HaloCatalog::new();
    let mut halos_by_id: HashMap<HaloId, HaloIdx> = HashMap::new();

    let halo_ids = ints(store, "halos/id")?;
    let count = halo_ids.len();
    let halo_snapshots = ints_n(store, "halos/snapshot", count)?;
    let halo_mvir = floats_n(store, "halos/mvir", count)?;
    let halo_vvir = floats_n(store, "halos/vvir", count)?;

    for i in 0..count {
        let id = HaloId::new(halo_ids[i] as u64);
        let mut halo = Halo::new(id, snapshot("halos/snapshot", halo_snapshots[i])?);
        halo.mvir = halo_mvir[i];
        halo.vvir = halo_vvir[i];
        let idx = catalog.add_halo(halo);
        halos_by_id.insert(id, idx);
    }

    let sub_ids = ints(store, "subhalos/id")?;
    let count = sub_ids.len();
    let sub_snapshots = ints_n(store, "subhalos/snapshot", count)?;
    let sub_hosts = ints_n(store, "subhalos/host_halo_id", count)?;
    let sub_mvir = floats_n(store, "subhalos/mvir", count)?;
    let sub_vvir = floats_n(store, "subhalos/vvir", count)?;
    let sub_lambda = floats_n(store, "subhalos/lambda", count)?;
    let sub_concentration = floats_n(store, "subhalos/concentration", count)?;
    let sub_position = vec3_columns(store, "subhalos/position", count)?;
    let sub_velocity = vec3_columns(store, "subhalos/velocity", count)?;
    let sub_l = vec3_columns(store, "subhalos/l", count)?;
    let has_descendant = ints_n(store, "subhalos/has_descendant", count)?;
    let descendant_halo_ids = ints_n(store, "subhalos/descendant_halo_id", count)?;
    let descendant_ids = ints_n(store, "subhalos/descendant_id", count)?;
    let main_progenitor = ints_n(store, "subhalos/main_progenitor", count)?;
    let is_interpolated = ints_n(store, "subhalos/is_interpolated", count)?;

    for i in 0..count {
        let id = SubhaloId::new(sub_ids[i] as u64);
        let host_id = HaloId::new(sub_hosts[i] as u64);
        let Some(&host) = halos_by_id.get(&host_id) else {
            return Err(IngestError::UnknownHostHalo {
                subhalo: id,
                halo: host_id,
            });
        };

        let mut sub = Subhalo::new(id, snapshot("subhalos/snapshot", sub_snapshots[i])?);
        sub.mvir = sub_mvir[i];
        sub.vvir = sub_vvir[i];
        sub.lambda = sub_lambda[i];
        sub.concentration = sub_concentration[i];
        sub.position = sub_position[i];
        sub.velocity = sub_velocity[i];
        sub.l = sub_l[i];
        sub.main_progenitor = main_progenitor[i] != 0;
        sub.is_interpolated = is_interpolated[i] != 0;
        if has_descendant[i] != 0 {
            sub.descendant_link = Some(DescendantLink {
                halo_id: HaloId::new(descendant_halo_ids[i] as u64),
                subhalo_id: SubhaloId::new(descendant_ids[i] as u64),
            });
        }

        catalog.add_subhalo(host, sub);
    }

    Ok(catalog)
}

fn floats<'a>(store: &'a DatasetStore, path: &str) -> Result<&'a [f64], IngestError> {
    store
        .get_dataset(path)?
        .floats()
        .ok_or_else(|| IngestError::ColumnType {
            path: path.into(),
            expected: "float",
        })
}

fn floats_n<'a>(
    store: &'a DatasetStore,
    path: &str,
    expected: usize,
) -> Result<&'a [f64], IngestError> {
    let values = floats(store, path)?;
    check_len(path, expected, values.len())?;
    Ok(values)
}

fn ints<'a>(store: &'a DatasetStore, path: &str) -> Result<&'a [i64], IngestError> {
    store
        .get_dataset(path)?
        .ints()
        .ok_or_else(|| IngestError::ColumnType {
            path: path.into(),
            expected: "int",
        })
}

fn ints_n<'a>(
    store: &'a DatasetStore,
    path: &str,
    expected: usize,
) -> Result<&'a [i64], IngestError> {
    let values = ints(store, path)?;
    check_len(path, expected, values.len())?;
    Ok(values)
}

fn check_len(path: &str, expected: usize, actual: usize) -> Result<(), IngestError> {
    if expected != actual {
        return Err(IngestError::ColumnLength {
            path: path.into(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Read `{prefix}_x`, `{prefix}_y`, `{prefix}_z` into per-entity vectors.
fn vec3_columns(
    store: &DatasetStore,
    prefix: &str,
    expected: usize,
) -> Result<Vec<Vec3>, IngestError> {
    let x = floats_n(store, &format!("{prefix}_x"), expected)?;
    let y = floats_n(store, &format!("{prefix}_y"), expected)?;
    let z = floats_n(store, &format!("{prefix}_z"), expected)?;
    Ok((0..expected).map(|i| [x[i], y[i], z[i]]).collect())
}

fn snapshot(path: &str, raw: i64) -> Result<Snapshot, IngestError> {
    i32::try_from(raw)
        .map(Snapshot::new)
        .map_err(|_| IngestError::ValueOutOfRange {
            path: path.into(),
            value: raw,
        })
}
