use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::util::Slice;

/// Consistency level attached to every read and write.
///
/// Only quorum is ever sent; the enum exists so the wire signature stays
/// explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyLevel {
    #[default]
    Quorum,
}

/// Atomic unit of stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: Slice,
    pub value: Slice,
    pub timestamp: i64,
}

impl Column {
    pub fn new(name: impl Into<Slice>, value: impl Into<Slice>, timestamp: i64) -> Self {
        Column {
            name: name.into(),
            value: value.into(),
            timestamp,
        }
    }
}

/// Named group of columns, one level of nesting under a row key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperColumn {
    pub name: Slice,
    pub columns: Vec<Column>,
}

impl SuperColumn {
    pub fn new(name: impl Into<Slice>, columns: Vec<Column>) -> Self {
        SuperColumn {
            name: name.into(),
            columns,
        }
    }
}

/// One unit returned by a slice read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOrSuperColumn {
    Column(Column),
    SuperColumn(SuperColumn),
}

/// Where a slice read looks: a family, optionally narrowed to the
/// sub-columns of one super-column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnParent {
    pub column_family: String,
    pub super_column: Option<Slice>,
}

impl ColumnParent {
    pub fn new(column_family: impl Into<String>) -> Self {
        ColumnParent {
            column_family: column_family.into(),
            super_column: None,
        }
    }

    pub fn with_super_column(mut self, name: Slice) -> Self {
        self.super_column = Some(name);
        self
    }
}

/// Wire form of a range read. Empty `start`/`finish` mean open bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRange {
    pub start: Slice,
    pub finish: Slice,
    pub reversed: bool,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlicePredicate {
    ColumnNames(Vec<Slice>),
    SliceRange(SliceRange),
}

impl SlicePredicate {
    pub fn is_range(&self) -> bool {
        matches!(self, SlicePredicate::SliceRange(_))
    }
}

/// Removal of columns older than or as old as `timestamp`.
///
/// - no super column, no predicate: the whole row
/// - super column, no predicate: the whole super-column
/// - predicate: the selected columns (or sub-columns of `super_column`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub timestamp: i64,
    pub super_column: Option<Slice>,
    pub predicate: Option<SlicePredicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Insert(ColumnOrSuperColumn),
    Delete(Deletion),
}

impl Mutation {
    pub fn column(column: Column) -> Self {
        Mutation::Insert(ColumnOrSuperColumn::Column(column))
    }

    pub fn super_column(super_column: SuperColumn) -> Self {
        Mutation::Insert(ColumnOrSuperColumn::SuperColumn(super_column))
    }
}

/// Row key → column family → mutations for that row.
pub type MutationMap = BTreeMap<Slice, BTreeMap<String, Vec<Mutation>>>;

/// Row key → units returned for that key.
pub type SliceResult = HashMap<Slice, Vec<ColumnOrSuperColumn>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Standard,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFamilyDef {
    pub keyspace: String,
    pub name: String,
    pub column_type: ColumnType,
    pub comparator_type: String,
    pub subcomparator_type: Option<String>,
}

impl ColumnFamilyDef {
    pub fn is_super(&self) -> bool {
        self.column_type == ColumnType::Super
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyspaceDef {
    pub name: String,
    pub strategy_class: String,
    pub strategy_options: BTreeMap<String, String>,
    pub replication_factor: u32,
    pub cf_defs: Vec<ColumnFamilyDef>,
}
