use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::{
    client::KeyspaceDef,
    connection::Connection,
    schema::{ColumnFamily, KeyspaceOptions},
    util::{Result, Status},
};

/// A keyspace on a [`Connection`].
///
/// Cloning is cheap; clones share the definition cached by the last
/// [`describe`](Keyspace::describe).
#[derive(Debug, Clone)]
pub struct Keyspace {
    connection: Arc<Connection>,
    name: Arc<str>,
    definition: Arc<RwLock<Option<KeyspaceDef>>>,
}

impl Keyspace {
    pub fn new(connection: Arc<Connection>, name: impl Into<String>) -> Self {
        Keyspace {
            connection,
            name: Arc::from(name.into()),
            definition: Arc::new(RwLock::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn column_family(&self, name: impl Into<String>) -> ColumnFamily {
        ColumnFamily::new(self.clone(), name)
    }

    /// Definition cached by the last `describe`, `create` or `materialize`.
    pub fn definition(&self) -> Option<KeyspaceDef> {
        self.definition.read().clone()
    }

    /// Column families known from the cached definition, each with its own
    /// definition already filled in.
    pub fn column_families(&self) -> BTreeMap<String, ColumnFamily> {
        let definition = self.definition.read();
        let Some(def) = definition.as_ref() else {
            return BTreeMap::new();
        };
        def.cf_defs
            .iter()
            .map(|cf_def| {
                let cf = self.column_family(cf_def.name.clone());
                cf.cache(Some(cf_def.clone()));
                (cf_def.name.clone(), cf)
            })
            .collect()
    }

    /// Fetch the definition from the store, `None` if the keyspace is absent.
    pub fn describe(&self) -> Result<Option<KeyspaceDef>> {
        let described = match self.connection.client().describe_keyspace(&self.name) {
            Ok(def) => Some(def),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                self.connection.statistics().record_error();
                return Err(e.context(format!("describe_keyspace '{}'", self.name)));
            },
        };
        *self.definition.write() = described.clone();
        Ok(described)
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.describe()?.is_some())
    }

    pub fn create(&self, options: &KeyspaceOptions) -> Result<()> {
        let def = options.to_def(&self.name);
        self.connection
            .client()
            .add_keyspace(&def)
            .map_err(|e| {
                self.connection.statistics().record_error();
                e.context(format!("add_keyspace '{}'", self.name))
            })?;
        self.connection.statistics().record_schema_change();
        info!(keyspace = %self.name, replication_factor = def.replication_factor, "created keyspace");
        *self.definition.write() = Some(def);
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        self.connection.drop_keyspace(&self.name).map_err(|e| {
            self.connection.statistics().record_error();
            e.context(format!("drop_keyspace '{}'", self.name))
        })?;
        self.connection.statistics().record_schema_change();
        info!(keyspace = %self.name, "dropped keyspace");
        *self.definition.write() = None;
        Ok(())
    }

    /// Create the keyspace if it is absent, otherwise check that its
    /// replication settings equal `options`.
    pub fn materialize(&self, options: &KeyspaceOptions) -> Result<()> {
        match self.describe()? {
            None => self.create(options),
            Some(existing) => {
                let diffs = options.mismatches(&existing);
                if diffs.is_empty() {
                    return Ok(());
                }
                warn!(keyspace = %self.name, ?diffs, "keyspace options differ from the stored ones");
                Err(Status::configuration_mismatch(format!(
                    "mismatched keyspace '{}': {}",
                    self.name,
                    diffs.join(", ")
                )))
            },
        }
    }
}
