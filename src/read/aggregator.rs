use std::collections::BTreeMap;

use crate::{
    client::{Column, ColumnOrSuperColumn, ColumnParent, SlicePredicate, SliceResult},
    util::{Result, Slice, Status},
    value::Value,
};

/// One remote slice read issued on behalf of a `read`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub parent: ColumnParent,
    pub predicate: SlicePredicate,
}

/// Joins the results of all slice reads of one `read`.
///
/// Rows are keyed by row key, then column name. Merging is commutative: the
/// same set of results yields the same rows in any completion order.
#[derive(Debug)]
pub struct Aggregator {
    rows: BTreeMap<Slice, BTreeMap<Slice, Value>>,
    pending: usize,
}

impl Aggregator {
    /// Every requested key starts with an empty row.
    pub fn new(keys: &[Slice], pending: usize) -> Self {
        Aggregator {
            rows: keys.iter().map(|k| (k.clone(), BTreeMap::new())).collect(),
            pending,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending
    }

    /// Fold one completed read in and return how many units it carried.
    ///
    /// Keys that were not requested are ignored.
    pub fn merge(&mut self, request: &ReadRequest, mut result: SliceResult) -> u64 {
        let mut units = 0;
        for (key, row) in self.rows.iter_mut() {
            let Some(returned) = result.remove(key) else {
                continue;
            };
            for unit in returned {
                units += 1;
                match unit {
                    ColumnOrSuperColumn::Column(column) => match &request.parent.super_column {
                        Some(super_column) => insert_sub_column(row, super_column, column),
                        None => {
                            row.insert(column.name, Value::Scalar(column.value));
                        },
                    },
                    ColumnOrSuperColumn::SuperColumn(sc) => {
                        for column in sc.columns {
                            insert_sub_column(row, &sc.name, column);
                        }
                    },
                }
            }
        }
        self.pending = self.pending.saturating_sub(1);
        units
    }

    /// `Map(key → Map(name → Scalar | Map(sub → Scalar)))`.
    pub fn finish(self) -> Result<Value> {
        if self.pending > 0 {
            return Err(Status::incomplete(format!(
                "{} slice reads still outstanding",
                self.pending
            )));
        }
        Ok(Value::Map(
            self.rows
                .into_iter()
                .map(|(key, row)| (key, Value::Map(row)))
                .collect(),
        ))
    }
}

fn insert_sub_column(row: &mut BTreeMap<Slice, Value>, super_column: &Slice, column: Column) {
    let entry = row
        .entry(super_column.clone())
        .or_insert_with(Value::empty_map);
    if let Value::Scalar(_) = entry {
        *entry = Value::empty_map();
    }
    if let Value::Map(subs) = entry {
        subs.insert(column.name, Value::Scalar(column.value));
    }
}

/// Unwrap collapsed levels, outermost first.
///
/// `levels[i]` is the name to unwrap at depth `i`, or `None` to keep that
/// level as a map and descend into every entry. An unwrapped name holding no
/// data yields `None`, and such entries are dropped from the enclosing map.
pub fn collapse(value: Value, levels: &[Option<Slice>]) -> Option<Value> {
    let Some((level, rest)) = levels.split_first() else {
        return Some(value);
    };
    let Value::Map(mut map) = value else {
        return Some(value);
    };
    match level {
        Some(name) => collapse(map.remove(name)?, rest),
        None => Some(Value::Map(
            map.into_iter()
                .filter_map(|(k, v)| collapse(v, rest).map(|v| (k, v)))
                .collect(),
        )),
    }
}
