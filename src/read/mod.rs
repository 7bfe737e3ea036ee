/// Read path: address chain → slice reads → caller-shaped value
///
/// ```text
/// PropertySet
///   ├─ build_predicates(leaf descriptors)        names → 1 predicate
///   │                                             range → 1 predicate each
///   ├─ × parent super-column names (if chained)
///   ├─ read_slice per request, all keys at once   (rayon fan-out)
///   ├─ Aggregator::merge under a mutex            (any completion order)
///   └─ collapse: key level, parent level, leaf level
/// ```
///
/// A chain with no keys or no descriptors reads nothing remotely and returns
/// one empty row per key. Any failed slice read fails the whole read; rows
/// merged from other requests are dropped.
pub mod aggregator;
pub mod predicate;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, warn};

pub use aggregator::{Aggregator, ReadRequest, collapse};
pub use predicate::build_predicates;

use crate::{
    address::PropertySet,
    client::{ColumnParent, ConsistencyLevel, SlicePredicate},
    util::{Result, Slice},
    value::Value,
};

/// Expand predicates over the parent super-columns, if any.
pub fn plan_requests(
    column_family: &str,
    parents: Option<&[Slice]>,
    predicates: Vec<SlicePredicate>,
) -> Vec<ReadRequest> {
    match parents {
        None => predicates
            .into_iter()
            .map(|predicate| ReadRequest {
                parent: ColumnParent::new(column_family),
                predicate,
            })
            .collect(),
        Some(parents) => parents
            .iter()
            .flat_map(|super_column| {
                predicates.iter().map(move |predicate| ReadRequest {
                    parent: ColumnParent::new(column_family)
                        .with_super_column(super_column.clone()),
                    predicate: predicate.clone(),
                })
            })
            .collect(),
    }
}

pub(crate) fn read(set: &PropertySet) -> Result<Option<Value>> {
    let parents = set.parent_names()?;
    let levels = set.collapse_levels()?;

    let key_set = set.key_set();
    let column_family = key_set.column_family();
    let keyspace = column_family.keyspace().name();
    let connection = key_set.connection();
    let statistics = connection.statistics();
    let keys = key_set.keys();

    let predicates = build_predicates(
        set.descriptors().items(),
        connection.options().default_range_limit,
    );
    let requests = plan_requests(column_family.name(), parents.as_deref(), predicates);
    statistics.record_read();

    if requests.is_empty() || keys.is_empty() {
        debug!(
            column_family = column_family.name(),
            keys = keys.len(),
            "nothing to read remotely"
        );
        return Ok(collapse(Aggregator::new(keys, 0).finish()?, &levels));
    }

    debug!(
        keyspace,
        column_family = column_family.name(),
        keys = keys.len(),
        requests = requests.len(),
        "issuing slice reads"
    );
    let aggregator = Mutex::new(Aggregator::new(keys, requests.len()));
    connection
        .with_keyspace(keyspace, |client| {
            let issue = |request: &ReadRequest| -> Result<()> {
                let rows = client
                    .read_slice(keys, &request.parent, &request.predicate, ConsistencyLevel::Quorum)
                    .map_err(|e| e.context(format!("read_slice on '{}'", column_family.name())))?;
                let units = aggregator.lock().merge(request, rows);
                statistics.record_slice_request(units);
                Ok(())
            };
            if connection.options().parallel_reads && requests.len() > 1 {
                requests.par_iter().try_for_each(issue)
            } else {
                requests.iter().try_for_each(issue)
            }
        })
        .inspect_err(|e| {
            statistics.record_error();
            warn!(column_family = column_family.name(), error = %e, "read failed");
        })?;

    let merged = aggregator.into_inner().finish()?;
    Ok(collapse(merged, &levels))
}

/// Read with leaf ranges capped at one column and test for any data.
///
/// A single-key chain checks its collapsed result; a multi-key chain checks
/// the entry of its first key.
pub(crate) fn exists(set: &PropertySet) -> Result<bool> {
    let probe = set.with_range_limit(1);
    let result = read(&probe)?;
    let key_set = set.key_set();
    let target = if key_set.address().is_single() {
        result
    } else {
        let first = key_set.keys().first();
        match (result, first) {
            (Some(Value::Map(mut rows)), Some(first)) => rows.remove(first),
            _ => None,
        }
    };
    Ok(target.is_some_and(|v| !v.is_empty()))
}
