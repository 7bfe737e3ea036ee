/// Address chain nodes below the column family
///
/// A read or write is described by a chain of immutable nodes:
///
/// ```text
/// Keyspace ─▶ ColumnFamily ─▶ KeySet ─▶ PropertySet [─▶ PropertySet]
///                               keys      names/ranges   sub-column names
/// ```
///
/// Every set level is an [`Address`]: `Single` means the caller asked for one
/// thing and wants it unwrapped in the result, `Many` keeps the level as a
/// map even when it holds one element.
///
/// # Usage
///
/// ```ignore
/// let users = conn.keyspace("app").column_family("users");
///
/// // "Alice"
/// users.key("u1").property("name").read()?;
///
/// // {u1: {name, email}, u2: {name, email}}
/// users.keys(["u1", "u2"]).properties(["name", "email"]).read()?;
///
/// // sub-column "city" of super-column "home"
/// profiles.key("u1").property("home").property("city").write("Oslo")?;
/// ```
pub mod descriptor;
pub mod key_set;
pub mod property_set;

pub use descriptor::{PropertyDescriptor, RangeDescriptor};
pub use key_set::KeySet;
pub use property_set::PropertySet;

/// One level of an address chain with its collapse intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> Address<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Address::Single(v) => std::slice::from_ref(v),
            Address::Many(v) => v,
        }
    }

    /// The element a `Single` address collapses onto.
    pub fn single(&self) -> Option<&T> {
        match self {
            Address::Single(v) => Some(v),
            Address::Many(_) => None,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Address::Single(_))
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Address<U> {
        match self {
            Address::Single(v) => Address::Single(f(v)),
            Address::Many(v) => Address::Many(v.iter().map(f).collect()),
        }
    }
}
