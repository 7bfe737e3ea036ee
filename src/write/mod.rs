/// Write path: address chain + value → one atomic mutation batch
///
/// ```text
/// Scalar   without parent   key → [Column(leaf, v)]                  per leaf
/// Scalar   with parent      key → [SuperColumn(parent, [Column(leaf, v)..])]
/// Columns  without parent   key → [SuperColumn(leaf, [Column(k, v)..])] per leaf
/// Columns  with parent      rejected
/// ```
///
/// Every column of one call carries the same timestamp. Validation happens
/// before anything is sent; a rejected write touches nothing remotely.
pub mod batch;

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

pub use batch::MutationBatch;

use crate::{
    address::{KeySet, PropertySet},
    client::{Column, ConsistencyLevel, Deletion, SuperColumn},
    read::build_predicates,
    util::{Result, Slice, Status},
    value::WriteValue,
};

/// Wall-clock seconds since the Unix epoch.
pub fn now_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Build the batch a write would send, without sending it.
pub fn plan_write(set: &PropertySet, value: &WriteValue, timestamp: i64) -> Result<MutationBatch> {
    let leaves = set.leaf_names()?;
    let parents = set.parent_names()?;
    let key_set = set.key_set();
    let column_family = key_set.column_family().name();

    let mut batch = MutationBatch::new();
    match value {
        WriteValue::Scalar(v) => {
            let columns: Vec<Column> = leaves
                .into_iter()
                .map(|name| Column::new(name, v.clone(), timestamp))
                .collect();
            match parents {
                None => {
                    for key in key_set.keys() {
                        for column in &columns {
                            batch.put_column(key.clone(), column_family, column.clone());
                        }
                    }
                },
                Some(parents) => {
                    let [parent] = parents.as_slice() else {
                        return Err(Status::invalid_argument(format!(
                            "a scalar write needs exactly one super-column, got {}",
                            parents.len()
                        )));
                    };
                    if columns.is_empty() {
                        return Ok(batch);
                    }
                    for key in key_set.keys() {
                        batch.put_super_column(
                            key.clone(),
                            column_family,
                            SuperColumn::new(parent.clone(), columns.clone()),
                        );
                    }
                },
            }
        },
        WriteValue::Columns(entries) => {
            if parents.is_some() {
                return Err(Status::invalid_argument(
                    "a mapping is written as super-columns and cannot sit under a parent",
                ));
            }
            if entries.is_empty() {
                return Err(Status::invalid_argument("cannot write an empty mapping"));
            }
            let sub_columns: Vec<Column> = entries
                .iter()
                .map(|(name, v)| Column::new(name.clone(), v.clone(), timestamp))
                .collect();
            for key in key_set.keys() {
                for leaf in &leaves {
                    batch.put_super_column(
                        key.clone(),
                        column_family,
                        SuperColumn::new(leaf.clone(), sub_columns.clone()),
                    );
                }
            }
        },
    }
    Ok(batch)
}

pub(crate) fn write(set: &PropertySet, value: &WriteValue, timestamp: i64) -> Result<()> {
    let key_set = set.key_set();
    let batch = plan_write(set, value, timestamp).inspect_err(|e| {
        key_set.connection().statistics().record_error();
        debug!(error = %e, "write rejected");
    })?;
    let (mutations, columns, bytes) = (batch.count(), batch.column_count(), batch.data_size());
    submit(key_set, batch, "write")?;
    key_set
        .connection()
        .statistics()
        .record_write(mutations as u64, columns as u64, bytes as u64);
    Ok(())
}

/// One whole-row deletion per key.
pub(crate) fn delete_rows(key_set: &KeySet, timestamp: i64) -> Result<()> {
    let column_family = key_set.column_family().name();
    let mut batch = MutationBatch::new();
    for key in key_set.keys() {
        batch.delete(
            key.clone(),
            column_family,
            Deletion {
                timestamp,
                super_column: None,
                predicate: None,
            },
        );
    }
    finish_delete(key_set, batch)
}

/// Build the deletions removing exactly the addressed properties.
pub fn plan_delete(set: &PropertySet, timestamp: i64) -> Result<MutationBatch> {
    let parents = set.parent_names()?;
    let key_set = set.key_set();
    let column_family = key_set.column_family().name();
    let predicates = build_predicates(
        set.descriptors().items(),
        key_set.connection().options().default_range_limit,
    );

    let super_columns: Vec<Option<Slice>> = match parents {
        None => vec![None],
        Some(parents) => parents.into_iter().map(Some).collect(),
    };

    let mut batch = MutationBatch::new();
    for key in key_set.keys() {
        for super_column in &super_columns {
            for predicate in &predicates {
                batch.delete(
                    key.clone(),
                    column_family,
                    Deletion {
                        timestamp,
                        super_column: super_column.clone(),
                        predicate: Some(predicate.clone()),
                    },
                );
            }
        }
    }
    Ok(batch)
}

pub(crate) fn delete_properties(set: &PropertySet, timestamp: i64) -> Result<()> {
    let batch = plan_delete(set, timestamp)?;
    finish_delete(set.key_set(), batch)
}

fn finish_delete(key_set: &KeySet, batch: MutationBatch) -> Result<()> {
    let mutations = batch.count();
    submit(key_set, batch, "delete")?;
    key_set.connection().statistics().record_delete(mutations as u64);
    Ok(())
}

/// Send `batch` as one quorum `batch_write` in the family's keyspace.
///
/// An empty batch is not sent.
fn submit(key_set: &KeySet, batch: MutationBatch, what: &str) -> Result<()> {
    let column_family = key_set.column_family();
    if batch.is_empty() {
        debug!(column_family = column_family.name(), what, "empty batch, nothing sent");
        return Ok(());
    }

    let connection = key_set.connection();
    let keyspace = column_family.keyspace().name();
    debug!(
        keyspace,
        column_family = column_family.name(),
        keys = batch.mutations().len(),
        mutations = batch.count(),
        what,
        "submitting batch"
    );
    let mutations = batch.into_mutation_map();
    connection
        .with_keyspace(keyspace, |client| {
            client
                .batch_write(&mutations, ConsistencyLevel::Quorum)
                .map_err(|e| e.context(format!("{what} on '{}'", column_family.name())))
        })
        .inspect_err(|e| {
            connection.statistics().record_error();
            warn!(column_family = column_family.name(), what, error = %e, "batch failed");
        })
}
