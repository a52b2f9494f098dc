use serde::{Deserialize, Serialize};

use crate::error::{RefdbError, Result};

/// Prime table size the store's diagnostics default to.
pub const DEFAULT_BUCKETS: usize = 1223;

/// Configuration for an in-memory reference database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefdbConfig {
    /// Number of references to reserve room for up front.
    pub initial_capacity: usize,
    /// Reject writes and renames whose names break the ref-name rules.
    pub validate_names: bool,
    /// Table size used when reporting collision chains in
    /// [`RefdbStats`](crate::RefdbStats).
    pub stats_buckets: usize,
}

impl Default for RefdbConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_BUCKETS,
            validate_names: true,
            stats_buckets: DEFAULT_BUCKETS,
        }
    }
}

impl RefdbConfig {
    /// A configuration that accepts any non-empty name.
    ///
    /// Useful when the host engine has already validated names.
    pub fn permissive() -> Self {
        Self {
            validate_names: false,
            ..Default::default()
        }
    }

    /// Parse a configuration from a TOML fragment. Missing keys take their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| RefdbError::Config(e.to_string()))?;
        if config.stats_buckets == 0 {
            return Err(RefdbError::Config("stats_buckets must be non-zero".into()));
        }
        Ok(config)
    }
}
