use crate::util::Slice;

/// Which properties of a row a [`PropertySet`](super::PropertySet) names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyDescriptor {
    /// A literal column (or super-column) name.
    Name(Slice),
    /// A contiguous run of columns in comparator order.
    Range(RangeDescriptor),
}

impl PropertyDescriptor {
    pub fn name(&self) -> Option<&Slice> {
        match self {
            PropertyDescriptor::Name(n) => Some(n),
            PropertyDescriptor::Range(_) => None,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, PropertyDescriptor::Range(_))
    }
}

impl From<&str> for PropertyDescriptor {
    fn from(s: &str) -> Self {
        PropertyDescriptor::Name(Slice::from(s))
    }
}

impl From<String> for PropertyDescriptor {
    fn from(s: String) -> Self {
        PropertyDescriptor::Name(Slice::from(s))
    }
}

impl From<Slice> for PropertyDescriptor {
    fn from(s: Slice) -> Self {
        PropertyDescriptor::Name(s)
    }
}

impl From<i64> for PropertyDescriptor {
    fn from(v: i64) -> Self {
        PropertyDescriptor::Name(Slice::from_i64(v))
    }
}

impl From<RangeDescriptor> for PropertyDescriptor {
    fn from(r: RangeDescriptor) -> Self {
        PropertyDescriptor::Range(r)
    }
}

/// Column range with optional bounds.
///
/// Unset fields fall back to: open start, open end, forward order, and the
/// connection's `default_range_limit`.
///
/// # Example
///
/// ```ignore
/// let newest_ten = RangeDescriptor::new().reversed().limit(10);
/// let a_to_m = RangeDescriptor::new().start("a").end("m");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeDescriptor {
    pub start: Option<Slice>,
    pub end: Option<Slice>,
    pub reversed: bool,
    pub limit: Option<u32>,
}

impl RangeDescriptor {
    pub fn new() -> Self {
        RangeDescriptor::default()
    }

    pub fn start(mut self, start: impl Into<Slice>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<Slice>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
