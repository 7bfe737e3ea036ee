/// Schema facade: keyspaces and column families
///
/// Thin create/describe/drop wrappers plus `materialize`, which creates a
/// missing keyspace or family and otherwise insists that the stored settings
/// match the requested ones.
///
/// # Usage
///
/// ```ignore
/// let app = conn.keyspace("app");
/// app.materialize(&KeyspaceOptions::default())?;
///
/// let profiles = app.column_family("profiles");
/// profiles.materialize(&ColumnFamilyOptions::super_family("UTF8Type", "UTF8Type"))?;
/// ```
///
/// A keyspace that does not exist describes as `None`; every other failure
/// is returned to the caller.
pub mod column_family;
pub mod keyspace;
pub mod options;

pub use column_family::ColumnFamily;
pub use keyspace::Keyspace;
pub use options::{ColumnFamilyOptions, KeyspaceOptions, SIMPLE_STRATEGY};
