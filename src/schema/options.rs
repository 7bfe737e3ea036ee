use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::{ColumnFamilyDef, ColumnType, KeyspaceDef};

pub const SIMPLE_STRATEGY: &str = "org.apache.cassandra.locator.SimpleStrategy";

const MARSHAL_PACKAGE: &str = "org.apache.cassandra.db.marshal.";

/// Replication settings for a keyspace.
///
/// ```ignore
/// let options = KeyspaceOptions {
///     replication_factor: 3,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyspaceOptions {
    /// Default: 1
    pub replication_factor: u32,

    /// Default: SimpleStrategy
    pub strategy_class: String,

    /// Extra strategy settings, e.g. per-datacenter factors
    /// Default: empty
    pub strategy_options: BTreeMap<String, String>,
}

impl Default for KeyspaceOptions {
    fn default() -> Self {
        KeyspaceOptions {
            replication_factor: 1,
            strategy_class: SIMPLE_STRATEGY.to_string(),
            strategy_options: BTreeMap::new(),
        }
    }
}

impl KeyspaceOptions {
    pub(crate) fn to_def(&self, name: &str) -> KeyspaceDef {
        KeyspaceDef {
            name: name.to_string(),
            strategy_class: self.strategy_class.clone(),
            strategy_options: self.strategy_options.clone(),
            replication_factor: self.replication_factor,
            cf_defs: vec![],
        }
    }

    /// Describe every setting of `existing` that differs from these options.
    pub(crate) fn mismatches(&self, existing: &KeyspaceDef) -> Vec<String> {
        let mut out = Vec::new();
        if self.replication_factor != existing.replication_factor {
            out.push(format!(
                "replication_factor (required: {} != existing: {})",
                self.replication_factor, existing.replication_factor
            ));
        }
        if self.strategy_class != existing.strategy_class {
            out.push(format!(
                "strategy_class (required: {} != existing: {})",
                self.strategy_class, existing.strategy_class
            ));
        }
        if self.strategy_options != existing.strategy_options {
            out.push(format!(
                "strategy_options (required: {:?} != existing: {:?})",
                self.strategy_options, existing.strategy_options
            ));
        }
        out
    }
}

/// Comparator settings for a column family.
///
/// Short comparator names such as `UTF8Type` are expanded to their
/// fully-qualified marshal class. Setting a sub-comparator makes the family a
/// super-column family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFamilyOptions {
    /// Default: BytesType
    pub comparator: String,

    /// Default: None (standard family)
    pub sub_comparator: Option<String>,
}

impl Default for ColumnFamilyOptions {
    fn default() -> Self {
        ColumnFamilyOptions {
            comparator: "BytesType".to_string(),
            sub_comparator: None,
        }
    }
}

impl ColumnFamilyOptions {
    pub fn standard(comparator: impl Into<String>) -> Self {
        ColumnFamilyOptions {
            comparator: comparator.into(),
            sub_comparator: None,
        }
    }

    pub fn super_family(comparator: impl Into<String>, sub_comparator: impl Into<String>) -> Self {
        ColumnFamilyOptions {
            comparator: comparator.into(),
            sub_comparator: Some(sub_comparator.into()),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        if self.sub_comparator.is_some() {
            ColumnType::Super
        } else {
            ColumnType::Standard
        }
    }

    pub(crate) fn to_def(&self, keyspace: &str, name: &str) -> ColumnFamilyDef {
        ColumnFamilyDef {
            keyspace: keyspace.to_string(),
            name: name.to_string(),
            column_type: self.column_type(),
            comparator_type: qualify(&self.comparator),
            subcomparator_type: self.sub_comparator.as_deref().map(qualify),
        }
    }

    pub(crate) fn mismatches(&self, existing: &ColumnFamilyDef) -> Vec<String> {
        let wanted = self.to_def(&existing.keyspace, &existing.name);
        let mut out = Vec::new();
        if wanted.comparator_type != existing.comparator_type {
            out.push(format!(
                "comparator_type (required: {} != existing: {})",
                wanted.comparator_type, existing.comparator_type
            ));
        }
        if wanted.subcomparator_type != existing.subcomparator_type {
            out.push(format!(
                "subcomparator_type (required: {:?} != existing: {:?})",
                wanted.subcomparator_type, existing.subcomparator_type
            ));
        }
        out
    }
}

fn qualify(comparator: &str) -> String {
    if comparator.contains('.') {
        comparator.to_string()
    } else {
        format!("{MARSHAL_PACKAGE}{comparator}")
    }
}
