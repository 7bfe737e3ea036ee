use std::sync::Arc;

use crate::{
    address::{Address, PropertyDescriptor, PropertySet, RangeDescriptor},
    connection::Connection,
    schema::ColumnFamily,
    util::{Result, Slice},
    write,
};

/// Row keys of one column family.
///
/// Built by [`ColumnFamily::key`] (collapsing) or [`ColumnFamily::keys`].
#[derive(Debug, Clone)]
pub struct KeySet {
    column_family: ColumnFamily,
    keys: Address<Slice>,
}

impl KeySet {
    pub(crate) fn new(column_family: ColumnFamily, keys: Address<Slice>) -> Self {
        KeySet {
            column_family,
            keys,
        }
    }

    pub fn column_family(&self) -> &ColumnFamily {
        &self.column_family
    }

    pub fn address(&self) -> &Address<Slice> {
        &self.keys
    }

    pub fn keys(&self) -> &[Slice] {
        self.keys.items()
    }

    pub(crate) fn connection(&self) -> &Arc<Connection> {
        self.column_family.keyspace().connection()
    }

    /// Address one column (or super-column) and unwrap it in results.
    pub fn property(&self, name: impl Into<Slice>) -> PropertySet {
        self.properties_at(Address::Single(PropertyDescriptor::Name(name.into())))
    }

    pub fn properties<I, P>(&self, properties: I) -> PropertySet
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyDescriptor>,
    {
        self.properties_at(Address::Many(
            properties.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn properties_at(&self, descriptors: Address<PropertyDescriptor>) -> PropertySet {
        PropertySet::new(self.clone(), descriptors, None)
    }

    /// True when the row holds at least one column.
    ///
    /// For a multi-key set only the first key is checked.
    pub fn exists(&self) -> Result<bool> {
        self.properties([RangeDescriptor::new().limit(1)]).exists()
    }

    /// Remove the whole rows.
    pub fn delete(&self) -> Result<()> {
        self.delete_at(write::now_seconds())
    }

    pub fn delete_at(&self, timestamp: i64) -> Result<()> {
        write::delete_rows(self, timestamp)
    }
}
