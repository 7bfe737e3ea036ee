use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::{Mutex, RwLock};

use crate::{
    client::{
        Column, ColumnFamilyDef, ColumnOrSuperColumn, ColumnParent, ColumnStoreClient,
        ConsistencyLevel, Deletion, KeyspaceDef, Mutation, MutationMap, SlicePredicate,
        SliceResult, SuperColumn,
    },
    util::{Result, Slice, Status},
};

/// Snapshot of how many times each client method was called.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub select_keyspace: u64,
    pub read_slice: u64,
    pub batch_write: u64,
    pub describe_keyspace: u64,
    pub add_keyspace: u64,
    pub drop_keyspace: u64,
    pub add_column_family: u64,
    pub drop_column_family: u64,
}

#[derive(Debug, Default)]
struct Counters {
    select_keyspace: AtomicU64,
    read_slice: AtomicU64,
    batch_write: AtomicU64,
    describe_keyspace: AtomicU64,
    add_keyspace: AtomicU64,
    drop_keyspace: AtomicU64,
    add_column_family: AtomicU64,
    drop_column_family: AtomicU64,
}

#[inline]
fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default)]
struct Row {
    columns: BTreeMap<Slice, Column>,
    super_columns: BTreeMap<Slice, BTreeMap<Slice, Column>>,
}

impl Row {
    fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.super_columns.is_empty()
    }

    fn prune(&mut self) {
        self.super_columns.retain(|_, subs| !subs.is_empty());
    }
}

#[derive(Debug)]
struct Family {
    def: ColumnFamilyDef,
    rows: BTreeMap<Slice, Row>,
}

#[derive(Debug)]
struct KeyspaceData {
    def: KeyspaceDef,
    families: BTreeMap<String, Family>,
}

/// Single-node column store held in memory.
///
/// Behaves like one replica answering every consistency level:
/// - writes win when their timestamp is greater than or equal to the stored
///   one, so a rewrite within the same second replaces the value
/// - deletions remove data stamped at or before the deletion timestamp; no
///   tombstones are kept
/// - a batch is validated completely before any of it is applied
#[derive(Debug, Default)]
pub struct InMemoryStore {
    keyspaces: RwLock<BTreeMap<String, KeyspaceData>>,
    current: Mutex<Option<String>>,
    counters: Counters,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    pub fn calls(&self) -> CallCounts {
        let c = &self.counters;
        CallCounts {
            select_keyspace: c.select_keyspace.load(Ordering::Relaxed),
            read_slice: c.read_slice.load(Ordering::Relaxed),
            batch_write: c.batch_write.load(Ordering::Relaxed),
            describe_keyspace: c.describe_keyspace.load(Ordering::Relaxed),
            add_keyspace: c.add_keyspace.load(Ordering::Relaxed),
            drop_keyspace: c.drop_keyspace.load(Ordering::Relaxed),
            add_column_family: c.add_column_family.load(Ordering::Relaxed),
            drop_column_family: c.drop_column_family.load(Ordering::Relaxed),
        }
    }

    /// Number of rows currently stored in a family, `None` if it is missing.
    pub fn row_count(&self, keyspace: &str, column_family: &str) -> Option<usize> {
        let keyspaces = self.keyspaces.read();
        let family = keyspaces.get(keyspace)?.families.get(column_family)?;
        Some(family.rows.len())
    }

    fn current_keyspace(&self) -> Result<String> {
        self.current
            .lock()
            .clone()
            .ok_or_else(|| Status::remote_failure("InvalidRequest: no keyspace has been selected"))
    }

    fn validate_mutation(def: &ColumnFamilyDef, mutation: &Mutation) -> Result<()> {
        let ok = match mutation {
            Mutation::Insert(ColumnOrSuperColumn::Column(_)) => !def.is_super(),
            Mutation::Insert(ColumnOrSuperColumn::SuperColumn(_)) => def.is_super(),
            Mutation::Delete(deletion) => deletion.super_column.is_none() || def.is_super(),
        };
        if ok {
            Ok(())
        } else {
            Err(Status::remote_failure(format!(
                "InvalidRequest: mutation does not fit {:?} column family '{}'",
                def.column_type, def.name
            )))
        }
    }

    fn apply(family: &mut Family, key: &Slice, mutation: &Mutation) {
        let is_super = family.def.is_super();
        let row = family.rows.entry(key.clone()).or_default();
        match mutation {
            Mutation::Insert(ColumnOrSuperColumn::Column(column)) => {
                upsert(&mut row.columns, column);
            },
            Mutation::Insert(ColumnOrSuperColumn::SuperColumn(sc)) => {
                let subs = row.super_columns.entry(sc.name.clone()).or_default();
                for column in &sc.columns {
                    upsert(subs, column);
                }
            },
            Mutation::Delete(deletion) => Self::apply_deletion(row, is_super, deletion),
        }
        row.prune();
        if row.is_empty() {
            family.rows.remove(key);
        }
    }

    fn apply_deletion(row: &mut Row, is_super: bool, deletion: &Deletion) {
        let ts = deletion.timestamp;
        match (&deletion.super_column, &deletion.predicate) {
            (None, None) => {
                retain_newer(&mut row.columns, ts);
                for subs in row.super_columns.values_mut() {
                    retain_newer(subs, ts);
                }
            },
            (Some(sc), None) => {
                if let Some(subs) = row.super_columns.get_mut(sc) {
                    retain_newer(subs, ts);
                }
            },
            (Some(sc), Some(predicate)) => {
                if let Some(subs) = row.super_columns.get_mut(sc) {
                    let names = selected_names(subs, predicate);
                    remove_older(subs, &names, ts);
                }
            },
            (None, Some(predicate)) if is_super => {
                for name in selected_names(&row.super_columns, predicate) {
                    if let Some(subs) = row.super_columns.get_mut(&name) {
                        retain_newer(subs, ts);
                    }
                }
            },
            (None, Some(predicate)) => {
                let names = selected_names(&row.columns, predicate);
                remove_older(&mut row.columns, &names, ts);
            },
        }
    }
}

fn upsert(map: &mut BTreeMap<Slice, Column>, column: &Column) {
    match map.get(&column.name) {
        Some(existing) if existing.timestamp > column.timestamp => {},
        _ => {
            map.insert(column.name.clone(), column.clone());
        },
    }
}

fn retain_newer(map: &mut BTreeMap<Slice, Column>, ts: i64) {
    map.retain(|_, c| c.timestamp > ts);
}

fn remove_older(map: &mut BTreeMap<Slice, Column>, names: &[Slice], ts: i64) {
    for name in names {
        if map.get(name).is_some_and(|c| c.timestamp <= ts) {
            map.remove(name);
        }
    }
}

fn selected_names<V>(map: &BTreeMap<Slice, V>, predicate: &SlicePredicate) -> Vec<Slice> {
    select(map, predicate)
        .into_iter()
        .map(|(name, _)| name.clone())
        .collect()
}

/// Apply a slice predicate to one sorted level of a row.
///
/// Range bounds are inclusive. When reversed, `start` is the upper bound and
/// iteration runs downwards.
fn select<'a, V>(
    map: &'a BTreeMap<Slice, V>,
    predicate: &'a SlicePredicate,
) -> Vec<(&'a Slice, &'a V)> {
    match predicate {
        SlicePredicate::ColumnNames(names) => {
            names.iter().filter_map(|n| map.get_key_value(n)).collect()
        },
        SlicePredicate::SliceRange(range) => {
            let bound = |s: &'a Slice| {
                if s.is_empty() {
                    Bound::Unbounded
                } else {
                    Bound::Included(s)
                }
            };
            let (lower, upper) = if range.reversed {
                (bound(&range.finish), bound(&range.start))
            } else {
                (bound(&range.start), bound(&range.finish))
            };
            if let (Bound::Included(lo), Bound::Included(hi)) = (lower, upper) {
                if lo > hi {
                    return Vec::new();
                }
            }
            let iter = map.range::<Slice, _>((lower, upper));
            let count = range.count as usize;
            if range.reversed {
                iter.rev().take(count).collect()
            } else {
                iter.take(count).collect()
            }
        },
    }
}

impl ColumnStoreClient for InMemoryStore {
    fn select_keyspace(&self, name: &str) -> Result<()> {
        bump(&self.counters.select_keyspace);
        if !self.keyspaces.read().contains_key(name) {
            return Err(Status::remote_failure(format!(
                "InvalidRequest: keyspace '{name}' does not exist"
            )));
        }
        *self.current.lock() = Some(name.to_string());
        Ok(())
    }

    fn read_slice(
        &self,
        keys: &[Slice],
        parent: &ColumnParent,
        predicate: &SlicePredicate,
        _consistency: ConsistencyLevel,
    ) -> Result<SliceResult> {
        bump(&self.counters.read_slice);
        let ks_name = self.current_keyspace()?;
        let keyspaces = self.keyspaces.read();
        let family = lookup_family(&keyspaces, &ks_name, &parent.column_family)?;
        if parent.super_column.is_some() && !family.def.is_super() {
            return Err(Status::remote_failure(format!(
                "InvalidRequest: '{}' is not a super column family",
                family.def.name
            )));
        }

        let mut out = SliceResult::with_capacity(keys.len());
        for key in keys {
            let units = match family.rows.get(key) {
                None => Vec::new(),
                Some(row) => match &parent.super_column {
                    Some(sc) => row
                        .super_columns
                        .get(sc)
                        .map(|subs| {
                            select(subs, predicate)
                                .into_iter()
                                .map(|(_, c)| ColumnOrSuperColumn::Column(c.clone()))
                                .collect()
                        })
                        .unwrap_or_default(),
                    None if family.def.is_super() => select(&row.super_columns, predicate)
                        .into_iter()
                        .map(|(name, subs)| {
                            ColumnOrSuperColumn::SuperColumn(SuperColumn {
                                name: name.clone(),
                                columns: subs.values().cloned().collect(),
                            })
                        })
                        .collect(),
                    None => select(&row.columns, predicate)
                        .into_iter()
                        .map(|(_, c)| ColumnOrSuperColumn::Column(c.clone()))
                        .collect(),
                },
            };
            out.insert(key.clone(), units);
        }
        Ok(out)
    }

    fn batch_write(&self, mutations: &MutationMap, _consistency: ConsistencyLevel) -> Result<()> {
        bump(&self.counters.batch_write);
        let ks_name = self.current_keyspace()?;
        let mut keyspaces = self.keyspaces.write();
        let ks = keyspaces
            .get_mut(&ks_name)
            .ok_or_else(|| Status::remote_failure(format!("keyspace '{ks_name}' vanished")))?;

        for families in mutations.values() {
            for (cf_name, list) in families {
                let family = ks.families.get(cf_name).ok_or_else(|| {
                    Status::remote_failure(format!(
                        "InvalidRequest: unconfigured column family '{cf_name}'"
                    ))
                })?;
                for mutation in list {
                    Self::validate_mutation(&family.def, mutation)?;
                }
            }
        }

        for (key, families) in mutations {
            for (cf_name, list) in families {
                let Some(family) = ks.families.get_mut(cf_name) else {
                    continue;
                };
                for mutation in list {
                    Self::apply(family, key, mutation);
                }
            }
        }
        Ok(())
    }

    fn describe_keyspace(&self, name: &str) -> Result<KeyspaceDef> {
        bump(&self.counters.describe_keyspace);
        let keyspaces = self.keyspaces.read();
        let ks = keyspaces
            .get(name)
            .ok_or_else(|| Status::not_found(format!("keyspace '{name}'")))?;
        let mut def = ks.def.clone();
        def.cf_defs = ks.families.values().map(|f| f.def.clone()).collect();
        Ok(def)
    }

    fn add_keyspace(&self, def: &KeyspaceDef) -> Result<()> {
        bump(&self.counters.add_keyspace);
        let mut keyspaces = self.keyspaces.write();
        if keyspaces.contains_key(&def.name) {
            return Err(Status::remote_failure(format!(
                "InvalidRequest: keyspace '{}' already exists",
                def.name
            )));
        }
        let families = def
            .cf_defs
            .iter()
            .map(|cf| {
                (
                    cf.name.clone(),
                    Family {
                        def: cf.clone(),
                        rows: BTreeMap::new(),
                    },
                )
            })
            .collect();
        let mut stored = def.clone();
        stored.cf_defs.clear();
        keyspaces.insert(
            def.name.clone(),
            KeyspaceData {
                def: stored,
                families,
            },
        );
        Ok(())
    }

    fn drop_keyspace(&self, name: &str) -> Result<()> {
        bump(&self.counters.drop_keyspace);
        if self.keyspaces.write().remove(name).is_none() {
            return Err(Status::remote_failure(format!(
                "InvalidRequest: keyspace '{name}' does not exist"
            )));
        }
        let mut current = self.current.lock();
        if current.as_deref() == Some(name) {
            *current = None;
        }
        Ok(())
    }

    fn add_column_family(&self, def: &ColumnFamilyDef) -> Result<()> {
        bump(&self.counters.add_column_family);
        let mut keyspaces = self.keyspaces.write();
        let ks = keyspaces.get_mut(&def.keyspace).ok_or_else(|| {
            Status::remote_failure(format!(
                "InvalidRequest: keyspace '{}' does not exist",
                def.keyspace
            ))
        })?;
        if ks.families.contains_key(&def.name) {
            return Err(Status::remote_failure(format!(
                "InvalidRequest: column family '{}' already exists",
                def.name
            )));
        }
        ks.families.insert(
            def.name.clone(),
            Family {
                def: def.clone(),
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn drop_column_family(&self, name: &str) -> Result<()> {
        bump(&self.counters.drop_column_family);
        let ks_name = self.current_keyspace()?;
        let mut keyspaces = self.keyspaces.write();
        let removed = keyspaces
            .get_mut(&ks_name)
            .and_then(|ks| ks.families.remove(name));
        match removed {
            Some(_) => Ok(()),
            None => Err(Status::remote_failure(format!(
                "InvalidRequest: column family '{name}' does not exist"
            ))),
        }
    }
}

fn lookup_family<'a>(
    keyspaces: &'a BTreeMap<String, KeyspaceData>,
    ks_name: &str,
    cf_name: &str,
) -> Result<&'a Family> {
    keyspaces
        .get(ks_name)
        .and_then(|ks| ks.families.get(cf_name))
        .ok_or_else(|| {
            Status::remote_failure(format!(
                "InvalidRequest: unconfigured column family '{cf_name}'"
            ))
        })
}
