use std::cmp::Ordering;
use std::fmt;

/// Owned byte string used for row keys, column names and column values.
///
/// Ordering is plain byte order, which is also the order `BytesType`,
/// `AsciiType` and `UTF8Type` comparators sort by.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Slice {
    data: Vec<u8>,
}

impl Slice {
    pub fn new(data: Vec<u8>) -> Self {
        Slice { data }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Slice {
            data: data.to_vec(),
        }
    }

    pub fn empty() -> Self {
        Slice { data: Vec::new() }
    }

    /// Encode as an 8-byte big-endian integer, the `LongType` layout.
    pub fn from_i64(v: i64) -> Self {
        Slice {
            data: v.to_be_bytes().to_vec(),
        }
    }

    /// Decode an 8-byte big-endian integer.
    pub fn to_i64(&self) -> Option<i64> {
        let bytes: [u8; 8] = self.data.as_slice().try_into().ok()?;
        Some(i64::from_be_bytes(bytes))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn compare(&self, other: &Slice) -> Ordering {
        self.data.cmp(&other.data)
    }
}

impl From<Vec<u8>> for Slice {
    fn from(data: Vec<u8>) -> Self {
        Slice::new(data)
    }
}

impl From<&[u8]> for Slice {
    fn from(data: &[u8]) -> Self {
        Slice::from_bytes(data)
    }
}

impl<const N: usize> From<&[u8; N]> for Slice {
    fn from(data: &[u8; N]) -> Self {
        Slice::from_bytes(data)
    }
}

impl From<String> for Slice {
    fn from(s: String) -> Self {
        Slice::new(s.into_bytes())
    }
}

impl From<&String> for Slice {
    fn from(s: &String) -> Self {
        Slice::from_bytes(s.as_bytes())
    }
}

impl From<&str> for Slice {
    fn from(s: &str) -> Self {
        Slice::from_bytes(s.as_bytes())
    }
}

impl From<i64> for Slice {
    fn from(v: i64) -> Self {
        Slice::from_i64(v)
    }
}

impl From<&Slice> for Slice {
    fn from(s: &Slice) -> Self {
        s.clone()
    }
}

impl AsRef<[u8]> for Slice {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialOrd for Slice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialEq<&str> for Slice {
    fn eq(&self, other: &&str) -> bool {
        self.data == other.as_bytes()
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.data) {
            Ok(s) => write!(f, "Slice(\"{s}\")"),
            Err(_) => write!(f, "Slice({:?})", self.data),
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.data) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self.data),
        }
    }
}
