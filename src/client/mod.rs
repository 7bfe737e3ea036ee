/// Remote column-store client interface
///
/// Everything the mapping layer needs from the store goes through
/// [`ColumnStoreClient`]. Transport, connection setup and the wire codec live
/// behind this trait; the crate itself only ships [`InMemoryStore`], a
/// single-node implementation used by tests and benchmarks.
///
/// # Concurrency
///
/// Implementations are shared between threads (`Send + Sync`) and must accept
/// concurrent `read_slice` calls: one `read` fans its predicates out on the
/// rayon pool. A transport that can only carry one request at a time must
/// serialize internally.
///
/// ```text
/// Connection ──select_keyspace──▶ client
///     │
///     ├── read ──▶ read_slice × N (concurrent) ──▶ merge
///     └── write ─▶ batch_write × 1
/// ```
pub mod memory;
pub mod types;

pub use memory::{CallCounts, InMemoryStore};
pub use types::{
    Column, ColumnFamilyDef, ColumnOrSuperColumn, ColumnParent, ColumnType, ConsistencyLevel,
    Deletion, KeyspaceDef, Mutation, MutationMap, SlicePredicate, SliceRange, SliceResult,
    SuperColumn,
};

use crate::util::{Result, Slice};

pub trait ColumnStoreClient: Send + Sync {
    /// Bind subsequent calls on this connection to `name`.
    fn select_keyspace(&self, name: &str) -> Result<()>;

    /// Multi-key slice read.
    ///
    /// The returned map holds an entry for every requested key that has
    /// data; keys without data may be absent or map to an empty vector.
    fn read_slice(
        &self,
        keys: &[Slice],
        parent: &ColumnParent,
        predicate: &SlicePredicate,
        consistency: ConsistencyLevel,
    ) -> Result<SliceResult>;

    /// Apply all mutations atomically.
    fn batch_write(&self, mutations: &MutationMap, consistency: ConsistencyLevel) -> Result<()>;

    /// Fails with a `NotFound` status when the keyspace does not exist.
    fn describe_keyspace(&self, name: &str) -> Result<KeyspaceDef>;

    fn add_keyspace(&self, def: &KeyspaceDef) -> Result<()>;

    fn drop_keyspace(&self, name: &str) -> Result<()>;

    fn add_column_family(&self, def: &ColumnFamilyDef) -> Result<()>;

    /// Drops `name` from the currently selected keyspace.
    fn drop_column_family(&self, name: &str) -> Result<()>;
}
