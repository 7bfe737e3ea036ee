mod options;

use std::{fmt, sync::Arc};

use parking_lot::{RwLock, RwLockUpgradableReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

pub use options::ConnectionOptions;

use crate::{
    client::ColumnStoreClient,
    schema::Keyspace,
    statistics::Statistics,
    util::Result,
};

/// Shared handle to a remote column store.
///
/// The store binds reads and writes to a "current" keyspace per connection.
/// `Connection` owns that binding: every operation names its keyspace and
/// runs under a guard on the selection.
///
/// # Keyspace selection
///
/// ```text
/// op(ks) ─▶ upgradable read ──selected == ks──▶ shared guard ─▶ run op
///                 │
///                 └─ otherwise ─▶ exclusive guard ─▶ select_keyspace(ks)
///                                   ─▶ downgrade to shared ─▶ run op
/// ```
///
/// Operations on the selected keyspace run concurrently. Switching waits
/// until every in-flight operation on the old keyspace has finished, so a
/// selection never changes underneath a running call.
pub struct Connection {
    client: Arc<dyn ColumnStoreClient>,
    selected: RwLock<Option<String>>,
    options: ConnectionOptions,
    statistics: Arc<Statistics>,
}

impl Connection {
    pub fn new(client: Arc<dyn ColumnStoreClient>) -> Self {
        Connection::with_options(client, ConnectionOptions::default())
    }

    pub fn with_options(client: Arc<dyn ColumnStoreClient>, options: ConnectionOptions) -> Self {
        Connection {
            client,
            selected: RwLock::new(None),
            options,
            statistics: Arc::new(Statistics::new()),
        }
    }

    pub fn keyspace(self: &Arc<Self>, name: impl Into<String>) -> Keyspace {
        Keyspace::new(Arc::clone(self), name)
    }

    pub fn client(&self) -> &dyn ColumnStoreClient {
        self.client.as_ref()
    }

    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    pub fn statistics(&self) -> &Arc<Statistics> {
        &self.statistics
    }

    pub fn selected_keyspace(&self) -> Option<String> {
        self.selected.read().clone()
    }

    /// Run `op` with `keyspace` selected on the connection.
    pub(crate) fn with_keyspace<T>(
        &self,
        keyspace: &str,
        op: impl FnOnce(&dyn ColumnStoreClient) -> Result<T>,
    ) -> Result<T> {
        let guard = self.selected.upgradable_read();
        if guard.as_deref() == Some(keyspace) {
            let _shared = RwLockUpgradableReadGuard::downgrade(guard);
            return op(self.client.as_ref());
        }

        let mut exclusive = RwLockUpgradableReadGuard::upgrade(guard);
        debug!(keyspace, "selecting keyspace");
        if let Err(e) = self.client.select_keyspace(keyspace) {
            // The remote binding is unknown after a failed select.
            *exclusive = None;
            self.statistics.record_error();
            warn!(keyspace, error = %e, "keyspace selection failed");
            return Err(e.context(format!("select_keyspace '{keyspace}'")));
        }
        *exclusive = Some(keyspace.to_string());
        self.statistics.record_keyspace_selection();

        let _shared = RwLockWriteGuard::downgrade(exclusive);
        op(self.client.as_ref())
    }

    /// Drop a keyspace, clearing the selection if it was the selected one.
    pub(crate) fn drop_keyspace(&self, keyspace: &str) -> Result<()> {
        let mut selected = self.selected.write();
        self.client.drop_keyspace(keyspace)?;
        if selected.as_deref() == Some(keyspace) {
            *selected = None;
        }
        Ok(())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("selected", &*self.selected.read())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::client::{InMemoryStore, KeyspaceDef};

    fn store_with(names: &[&str]) -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        for name in names {
            store
                .add_keyspace(&KeyspaceDef {
                    name: name.to_string(),
                    strategy_class: "org.apache.cassandra.locator.SimpleStrategy".to_string(),
                    strategy_options: BTreeMap::new(),
                    replication_factor: 1,
                    cf_defs: vec![],
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_selection_is_skipped_when_current() {
        let store = store_with(&["a", "b"]);
        let conn = Connection::new(store.clone());

        conn.with_keyspace("a", |_| Ok(())).unwrap();
        conn.with_keyspace("a", |_| Ok(())).unwrap();
        assert_eq!(store.calls().select_keyspace, 1);

        conn.with_keyspace("b", |_| Ok(())).unwrap();
        assert_eq!(store.calls().select_keyspace, 2);
        assert_eq!(conn.selected_keyspace().as_deref(), Some("b"));
        assert_eq!(conn.statistics().num_keyspace_selections(), 2);
    }

    #[test]
    fn test_failed_selection_is_not_cached() {
        let store = store_with(&[]);
        let conn = Connection::new(store.clone());

        let err = conn.with_keyspace("missing", |_| Ok(())).unwrap_err();
        assert!(err.is_remote_failure());
        assert_eq!(conn.selected_keyspace(), None);

        let _ = conn.with_keyspace("missing", |_| Ok(()));
        assert_eq!(store.calls().select_keyspace, 2);
    }

    #[test]
    fn test_op_error_keeps_selection() {
        let store = store_with(&["a"]);
        let conn = Connection::new(store);
        let err = conn
            .with_keyspace("a", |_| -> Result<()> {
                Err(crate::util::Status::remote_failure("boom"))
            })
            .unwrap_err();
        assert!(err.is_remote_failure());
        assert_eq!(conn.selected_keyspace().as_deref(), Some("a"));
    }

    #[test]
    fn test_drop_selected_keyspace_clears_selection() {
        let store = store_with(&["a"]);
        let conn = Connection::new(store);
        conn.with_keyspace("a", |_| Ok(())).unwrap();
        conn.drop_keyspace("a").unwrap();
        assert_eq!(conn.selected_keyspace(), None);
    }

    #[test]
    fn test_concurrent_keyspace_switching() {
        let store = store_with(&["a", "b"]);
        let conn = Arc::new(Connection::new(store.clone()));

        std::thread::scope(|s| {
            for i in 0..8 {
                let conn = Arc::clone(&conn);
                s.spawn(move || {
                    let ks = if i % 2 == 0 { "a" } else { "b" };
                    for _ in 0..50 {
                        conn.with_keyspace(ks, |_| {
                            let selected = conn.selected.read_recursive();
                            assert_eq!(selected.as_deref(), Some(ks));
                            Ok(())
                        })
                        .unwrap();
                    }
                });
            }
        });
        assert!(store.calls().select_keyspace >= 2);
    }
}
