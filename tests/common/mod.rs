#![allow(dead_code)]

use std::{
    sync::{
        Arc, Once,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use colchain::{
    ColumnFamily, ColumnFamilyDef, ColumnFamilyOptions, ColumnParent, ColumnStoreClient,
    Connection, ConnectionOptions, ConsistencyLevel, InMemoryStore, Keyspace, KeyspaceDef,
    KeyspaceOptions, MutationMap, Result, Slice, SlicePredicate, SliceResult, Status,
};
use parking_lot::Mutex;

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing() {
    INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub const KEYSPACE: &str = "app";
pub const USERS: &str = "users";
pub const PROFILES: &str = "profiles";

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub connection: Arc<Connection>,
    pub keyspace: Keyspace,
}

impl Fixture {
    pub fn users(&self) -> ColumnFamily {
        self.keyspace.column_family(USERS)
    }

    pub fn profiles(&self) -> ColumnFamily {
        self.keyspace.column_family(PROFILES)
    }
}

/// Keyspace `app` with a standard family `users` and a super family
/// `profiles`, both materialized.
pub fn setup() -> Fixture {
    setup_with_options(ConnectionOptions::default())
}

pub fn setup_with_options(options: ConnectionOptions) -> Fixture {
    init_tracing();
    let store = Arc::new(InMemoryStore::new());
    let connection = Arc::new(Connection::with_options(store.clone(), options));
    let keyspace = materialize_schema(&connection);
    Fixture {
        store,
        connection,
        keyspace,
    }
}

pub fn materialize_schema(connection: &Arc<Connection>) -> Keyspace {
    let keyspace = connection.keyspace(KEYSPACE);
    keyspace.materialize(&KeyspaceOptions::default()).unwrap();
    keyspace
        .column_family(USERS)
        .materialize(&ColumnFamilyOptions::standard("UTF8Type"))
        .unwrap();
    keyspace
        .column_family(PROFILES)
        .materialize(&ColumnFamilyOptions::super_family("UTF8Type", "UTF8Type"))
        .unwrap();
    keyspace
}

/// One recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SelectKeyspace(String),
    ReadSlice {
        keys: Vec<Slice>,
        parent: ColumnParent,
        predicate: SlicePredicate,
    },
    BatchWrite(MutationMap),
    DescribeKeyspace(String),
    AddKeyspace(String),
    DropKeyspace(String),
    AddColumnFamily(String),
    DropColumnFamily(String),
}

/// Forwards every call to `inner` and keeps a log of them.
pub struct RecordingClient {
    inner: Arc<dyn ColumnStoreClient>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingClient {
    pub fn new(inner: Arc<dyn ColumnStoreClient>) -> Self {
        RecordingClient {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn reads(&self) -> Vec<(ColumnParent, SlicePredicate)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ReadSlice {
                    parent, predicate, ..
                } => Some((parent, predicate)),
                _ => None,
            })
            .collect()
    }

    pub fn batches(&self) -> Vec<MutationMap> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::BatchWrite(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Calls that touch data, i.e. everything but schema and selection.
    pub fn data_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ReadSlice { .. } | Call::BatchWrite(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl ColumnStoreClient for RecordingClient {
    fn select_keyspace(&self, name: &str) -> Result<()> {
        self.record(Call::SelectKeyspace(name.to_string()));
        self.inner.select_keyspace(name)
    }

    fn read_slice(
        &self,
        keys: &[Slice],
        parent: &ColumnParent,
        predicate: &SlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<SliceResult> {
        self.record(Call::ReadSlice {
            keys: keys.to_vec(),
            parent: parent.clone(),
            predicate: predicate.clone(),
        });
        self.inner.read_slice(keys, parent, predicate, consistency)
    }

    fn batch_write(&self, mutations: &MutationMap, consistency: ConsistencyLevel) -> Result<()> {
        self.record(Call::BatchWrite(mutations.clone()));
        self.inner.batch_write(mutations, consistency)
    }

    fn describe_keyspace(&self, name: &str) -> Result<KeyspaceDef> {
        self.record(Call::DescribeKeyspace(name.to_string()));
        self.inner.describe_keyspace(name)
    }

    fn add_keyspace(&self, def: &KeyspaceDef) -> Result<()> {
        self.record(Call::AddKeyspace(def.name.clone()));
        self.inner.add_keyspace(def)
    }

    fn drop_keyspace(&self, name: &str) -> Result<()> {
        self.record(Call::DropKeyspace(name.to_string()));
        self.inner.drop_keyspace(name)
    }

    fn add_column_family(&self, def: &ColumnFamilyDef) -> Result<()> {
        self.record(Call::AddColumnFamily(def.name.clone()));
        self.inner.add_column_family(def)
    }

    fn drop_column_family(&self, name: &str) -> Result<()> {
        self.record(Call::DropColumnFamily(name.to_string()));
        self.inner.drop_column_family(name)
    }
}

/// Store whose data calls can be switched to fail.
pub struct FailingClient {
    inner: Arc<dyn ColumnStoreClient>,
    /// Fail range reads only, names reads go through
    pub fail_range_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_select: AtomicBool,
}

impl FailingClient {
    pub fn new(inner: Arc<dyn ColumnStoreClient>) -> Self {
        FailingClient {
            inner,
            fail_range_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_select: AtomicBool::new(false),
        }
    }
}

impl ColumnStoreClient for FailingClient {
    fn select_keyspace(&self, name: &str) -> Result<()> {
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(Status::connection_error("connection reset"));
        }
        self.inner.select_keyspace(name)
    }

    fn read_slice(
        &self,
        keys: &[Slice],
        parent: &ColumnParent,
        predicate: &SlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<SliceResult> {
        if predicate.is_range() && self.fail_range_reads.load(Ordering::SeqCst) {
            return Err(Status::remote_failure("TimedOut"));
        }
        self.inner.read_slice(keys, parent, predicate, consistency)
    }

    fn batch_write(&self, mutations: &MutationMap, consistency: ConsistencyLevel) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Status::remote_failure("UnavailableException"));
        }
        self.inner.batch_write(mutations, consistency)
    }

    fn describe_keyspace(&self, name: &str) -> Result<KeyspaceDef> {
        self.inner.describe_keyspace(name)
    }

    fn add_keyspace(&self, def: &KeyspaceDef) -> Result<()> {
        self.inner.add_keyspace(def)
    }

    fn drop_keyspace(&self, name: &str) -> Result<()> {
        self.inner.drop_keyspace(name)
    }

    fn add_column_family(&self, def: &ColumnFamilyDef) -> Result<()> {
        self.inner.add_column_family(def)
    }

    fn drop_column_family(&self, name: &str) -> Result<()> {
        self.inner.drop_column_family(name)
    }
}

/// Delays range reads. Ranges are issued before names, so with parallel
/// reads they complete last.
pub struct DelayingClient {
    inner: Arc<dyn ColumnStoreClient>,
    delay: Duration,
    completed: Mutex<Vec<SlicePredicate>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl DelayingClient {
    pub fn new(inner: Arc<dyn ColumnStoreClient>, delay: Duration) -> Self {
        DelayingClient {
            inner,
            delay,
            completed: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Predicates in the order their reads finished.
    pub fn completion_order(&self) -> Vec<SlicePredicate> {
        self.completed.lock().clone()
    }
}

impl ColumnStoreClient for DelayingClient {
    fn select_keyspace(&self, name: &str) -> Result<()> {
        self.inner.select_keyspace(name)
    }

    fn read_slice(
        &self,
        keys: &[Slice],
        parent: &ColumnParent,
        predicate: &SlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<SliceResult> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if predicate.is_range() {
            thread::sleep(self.delay);
        }
        let result = self.inner.read_slice(keys, parent, predicate, consistency);
        self.completed.lock().push(predicate.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn batch_write(&self, mutations: &MutationMap, consistency: ConsistencyLevel) -> Result<()> {
        self.inner.batch_write(mutations, consistency)
    }

    fn describe_keyspace(&self, name: &str) -> Result<KeyspaceDef> {
        self.inner.describe_keyspace(name)
    }

    fn add_keyspace(&self, def: &KeyspaceDef) -> Result<()> {
        self.inner.add_keyspace(def)
    }

    fn drop_keyspace(&self, name: &str) -> Result<()> {
        self.inner.drop_keyspace(name)
    }

    fn add_column_family(&self, def: &ColumnFamilyDef) -> Result<()> {
        self.inner.add_column_family(def)
    }

    fn drop_column_family(&self, name: &str) -> Result<()> {
        self.inner.drop_column_family(name)
    }
}

/// Connection over `wrap(store)` with the schema materialized.
pub fn wrapped<C, F>(wrap: F) -> (Arc<InMemoryStore>, Arc<C>, Arc<Connection>, Keyspace)
where
    C: ColumnStoreClient + 'static,
    F: FnOnce(Arc<dyn ColumnStoreClient>) -> C,
{
    init_tracing();
    let store = Arc::new(InMemoryStore::new());
    let inner: Arc<dyn ColumnStoreClient> = store.clone();
    let client = Arc::new(wrap(inner));
    let connection = Arc::new(Connection::new(client.clone()));
    let keyspace = materialize_schema(&connection);
    (store, client, connection, keyspace)
}
