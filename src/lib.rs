pub mod address;
pub mod client;
pub mod connection;
pub mod read;
pub mod schema;
pub mod statistics;
pub mod util;
pub mod value;
pub mod write;

pub use address::{Address, KeySet, PropertyDescriptor, PropertySet, RangeDescriptor};
pub use client::{
    CallCounts, Column, ColumnFamilyDef, ColumnOrSuperColumn, ColumnParent, ColumnStoreClient,
    ColumnType, ConsistencyLevel, Deletion, InMemoryStore, KeyspaceDef, Mutation, MutationMap,
    SlicePredicate, SliceRange, SliceResult, SuperColumn,
};
pub use connection::{Connection, ConnectionOptions};
pub use schema::{ColumnFamily, ColumnFamilyOptions, Keyspace, KeyspaceOptions, SIMPLE_STRATEGY};
pub use statistics::Statistics;
pub use util::{Code, Result, Slice, Status};
pub use value::{Value, WriteValue};
pub use write::MutationBatch;
