use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::{
    address::{Address, KeySet},
    client::ColumnFamilyDef,
    schema::{ColumnFamilyOptions, Keyspace},
    util::{Result, Slice, Status},
};

/// A column family inside a [`Keyspace`], the root of key addressing.
#[derive(Debug, Clone)]
pub struct ColumnFamily {
    keyspace: Keyspace,
    name: Arc<str>,
    definition: Arc<RwLock<Option<ColumnFamilyDef>>>,
}

impl ColumnFamily {
    pub fn new(keyspace: Keyspace, name: impl Into<String>) -> Self {
        ColumnFamily {
            keyspace,
            name: Arc::from(name.into()),
            definition: Arc::new(RwLock::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Address one row; results are unwrapped to that row.
    pub fn key(&self, key: impl Into<Slice>) -> KeySet {
        self.keys_at(Address::Single(key.into()))
    }

    pub fn keys<I, K>(&self, keys: I) -> KeySet
    where
        I: IntoIterator<Item = K>,
        K: Into<Slice>,
    {
        self.keys_at(Address::Many(keys.into_iter().map(Into::into).collect()))
    }

    pub fn keys_at(&self, keys: Address<Slice>) -> KeySet {
        KeySet::new(self.clone(), keys)
    }

    pub fn definition(&self) -> Option<ColumnFamilyDef> {
        self.definition.read().clone()
    }

    /// Whether the family stores super-columns, if it has been described.
    pub fn is_super(&self) -> Option<bool> {
        self.definition.read().as_ref().map(ColumnFamilyDef::is_super)
    }

    pub(crate) fn cache(&self, definition: Option<ColumnFamilyDef>) {
        *self.definition.write() = definition;
    }

    /// Refresh the owning keyspace and pick this family's definition out of
    /// it. `None` if either is absent.
    pub fn describe(&self) -> Result<Option<ColumnFamilyDef>> {
        let described = self
            .keyspace
            .describe()?
            .and_then(|ks| ks.cf_defs.into_iter().find(|cf| cf.name == self.name()));
        self.cache(described.clone());
        Ok(described)
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.describe()?.is_some())
    }

    pub fn create(&self, options: &ColumnFamilyOptions) -> Result<()> {
        let connection = self.keyspace.connection();
        let def = options.to_def(self.keyspace.name(), &self.name);
        connection
            .with_keyspace(self.keyspace.name(), |client| client.add_column_family(&def))
            .map_err(|e| {
                connection.statistics().record_error();
                e.context(format!("add_column_family '{}'", self.name))
            })?;
        connection.statistics().record_schema_change();
        info!(
            keyspace = self.keyspace.name(),
            column_family = %self.name,
            column_type = ?def.column_type,
            "created column family"
        );
        self.cache(Some(def));
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        let connection = self.keyspace.connection();
        connection
            .with_keyspace(self.keyspace.name(), |client| {
                client.drop_column_family(&self.name)
            })
            .map_err(|e| {
                connection.statistics().record_error();
                e.context(format!("drop_column_family '{}'", self.name))
            })?;
        connection.statistics().record_schema_change();
        info!(keyspace = self.keyspace.name(), column_family = %self.name, "dropped column family");
        self.cache(None);
        Ok(())
    }

    /// Create the family if it is absent, otherwise check that its
    /// comparators equal `options`.
    pub fn materialize(&self, options: &ColumnFamilyOptions) -> Result<()> {
        match self.describe()? {
            None => self.create(options),
            Some(existing) => {
                let diffs = options.mismatches(&existing);
                if diffs.is_empty() {
                    return Ok(());
                }
                warn!(column_family = %self.name, ?diffs, "column family options differ from the stored ones");
                Err(Status::configuration_mismatch(format!(
                    "mismatched column family '{}': {}",
                    self.name,
                    diffs.join(", ")
                )))
            },
        }
    }
}
