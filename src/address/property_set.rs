use crate::{
    address::{Address, KeySet, PropertyDescriptor},
    read,
    util::{Result, Slice, Status},
    value::{Value, WriteValue},
    write,
};

/// Properties of the rows in a [`KeySet`].
///
/// Chaining a second `PropertySet` under a first one addresses sub-columns:
/// the parent names the super-column, the child names its sub-columns. The
/// store nests only one level, so a third level is rejected when the chain
/// is used.
#[derive(Debug, Clone)]
pub struct PropertySet {
    key_set: KeySet,
    descriptors: Address<PropertyDescriptor>,
    parent: Option<Box<PropertySet>>,
}

impl PropertySet {
    pub(crate) fn new(
        key_set: KeySet,
        descriptors: Address<PropertyDescriptor>,
        parent: Option<Box<PropertySet>>,
    ) -> Self {
        PropertySet {
            key_set,
            descriptors,
            parent,
        }
    }

    pub fn key_set(&self) -> &KeySet {
        &self.key_set
    }

    pub fn descriptors(&self) -> &Address<PropertyDescriptor> {
        &self.descriptors
    }

    pub fn parent(&self) -> Option<&PropertySet> {
        self.parent.as_deref()
    }

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
        PropertySet::new(
            self.key_set.clone(),
            descriptors,
            Some(Box::new(self.clone())),
        )
    }

    /// Fetch the addressed data.
    ///
    /// Returns `None` only when a collapsed level names something that holds
    /// no data.
    pub fn read(&self) -> Result<Option<Value>> {
        read::read(self)
    }

    pub fn exists(&self) -> Result<bool> {
        read::exists(self)
    }

    pub fn write(&self, value: impl Into<WriteValue>) -> Result<()> {
        self.write_at(value, write::now_seconds())
    }

    /// Write with an explicit conflict-resolution timestamp (seconds).
    pub fn write_at(&self, value: impl Into<WriteValue>, timestamp: i64) -> Result<()> {
        write::write(self, &value.into(), timestamp)
    }

    /// Remove exactly the addressed columns or sub-columns.
    pub fn delete(&self) -> Result<()> {
        self.delete_at(write::now_seconds())
    }

    pub fn delete_at(&self, timestamp: i64) -> Result<()> {
        write::delete_properties(self, timestamp)
    }

    /// Super-column names of the parent level, `None` without a parent.
    pub(crate) fn parent_names(&self) -> Result<Option<Vec<Slice>>> {
        let Some(parent) = &self.parent else {
            return Ok(None);
        };
        if parent.parent.is_some() {
            return Err(Status::invalid_argument(
                "columns nest only one level deep: a property set takes at most one parent",
            ));
        }
        parent
            .descriptors
            .items()
            .iter()
            .map(|d| {
                d.name().cloned().ok_or_else(|| {
                    Status::invalid_argument("super-columns must be addressed by name, not by range")
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Leaf names for writes, which cannot target ranges.
    pub(crate) fn leaf_names(&self) -> Result<Vec<Slice>> {
        self.descriptors
            .items()
            .iter()
            .map(|d| {
                d.name()
                    .cloned()
                    .ok_or_else(|| Status::invalid_argument("cannot write to a column range"))
            })
            .collect()
    }

    /// Name to unwrap at each result level, outermost first.
    pub(crate) fn collapse_levels(&self) -> Result<Vec<Option<Slice>>> {
        let mut levels = vec![self.key_set.address().single().cloned()];
        if let Some(parent) = &self.parent {
            levels.push(parent.descriptors.single().and_then(|d| d.name()).cloned());
        }
        let leaf = match self.descriptors.single() {
            None => None,
            Some(PropertyDescriptor::Name(name)) => Some(name.clone()),
            Some(PropertyDescriptor::Range(_)) => {
                return Err(Status::invalid_argument(
                    "a range cannot be collapsed onto a single property",
                ));
            },
        };
        levels.push(leaf);
        Ok(levels)
    }

    /// Same chain with every leaf range capped at `limit` columns.
    pub(crate) fn with_range_limit(&self, limit: u32) -> PropertySet {
        let descriptors = self.descriptors.map(|d| match d {
            PropertyDescriptor::Range(r) => {
                let mut r = r.clone();
                r.limit = Some(limit);
                PropertyDescriptor::Range(r)
            },
            PropertyDescriptor::Name(_) => d.clone(),
        });
        PropertySet::new(self.key_set.clone(), descriptors, self.parent.clone())
    }
}
