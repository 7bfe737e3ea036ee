use std::collections::BTreeMap;

use crate::util::Slice;

/// Result of a read, shaped like the address that produced it.
///
/// An uncollapsed read returns `Map(key → Map(property → ...))`; every
/// collapse marker on the chain removes one level of `Map`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Slice),
    Map(BTreeMap<Slice, Value>),
}

impl Value {
    pub fn empty_map() -> Self {
        Value::Map(BTreeMap::new())
    }

    pub fn as_scalar(&self) -> Option<&Slice> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<Slice, Value>> {
        match self {
            Value::Map(m) => Some(m),
            Value::Scalar(_) => None,
        }
    }

    /// Look up a child entry; `None` for scalars and missing names.
    pub fn get(&self, name: impl Into<Slice>) -> Option<&Value> {
        self.as_map()?.get(&name.into())
    }

    /// A scalar is never empty, a map is empty when it has no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(_) => false,
            Value::Map(m) => m.is_empty(),
        }
    }

    pub fn into_map(self) -> Option<BTreeMap<Slice, Value>> {
        match self {
            Value::Map(m) => Some(m),
            Value::Scalar(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Slice::from(s))
    }
}

impl From<Slice> for Value {
    fn from(s: Slice) -> Self {
        Value::Scalar(s)
    }
}

impl<K: Into<Slice>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// What a write stores under the addressed properties.
///
/// - `Scalar`: one column per leaf property
/// - `Columns`: one super-column per leaf property, each holding these
///   sub-columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteValue {
    Scalar(Slice),
    Columns(BTreeMap<Slice, Slice>),
}

impl WriteValue {
    pub fn columns<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Slice>,
        V: Into<Slice>,
    {
        WriteValue::Columns(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for WriteValue {
    fn from(s: &str) -> Self {
        WriteValue::Scalar(Slice::from(s))
    }
}

impl From<String> for WriteValue {
    fn from(s: String) -> Self {
        WriteValue::Scalar(Slice::from(s))
    }
}

impl From<Vec<u8>> for WriteValue {
    fn from(v: Vec<u8>) -> Self {
        WriteValue::Scalar(Slice::from(v))
    }
}

impl From<i64> for WriteValue {
    fn from(v: i64) -> Self {
        WriteValue::Scalar(Slice::from_i64(v))
    }
}

impl From<Slice> for WriteValue {
    fn from(s: Slice) -> Self {
        WriteValue::Scalar(s)
    }
}

impl From<BTreeMap<Slice, Slice>> for WriteValue {
    fn from(m: BTreeMap<Slice, Slice>) -> Self {
        WriteValue::Columns(m)
    }
}
