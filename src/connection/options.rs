use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::util::Result;

/// Options for a [`Connection`](super::Connection)
///
/// # Example
///
/// ```ignore
/// use colchain::ConnectionOptions;
///
/// let options = ConnectionOptions {
///     parallel_reads: false,      // issue predicate reads one after another
///     default_range_limit: 500,   // columns per range without explicit limit
/// };
/// ```
///
/// Loadable from JSON; missing fields take their defaults:
///
/// ```json
/// { "default_range_limit": 500 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// Fan a read's predicates out on the rayon pool
    /// Default: true
    pub parallel_reads: bool,

    /// Column count for range descriptors without a limit
    /// Default: 100
    pub default_range_limit: u32,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        ConnectionOptions {
            parallel_reads: true,
            default_range_limit: 100,
        }
    }
}

impl ConnectionOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
