//! Network configuration
//!
//! Settings can be built in code or loaded from RON:
//!
//! ```
//! use sigflow_core::NetworkConfig;
//!
//! let config = NetworkConfig::from_ron("(max_delta_cycles: 50)").unwrap();
//! assert_eq!(config.max_delta_cycles(), 50);
//! assert!(config.auto_link_architectures());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default bound on consecutive delta steps
pub const DEFAULT_MAX_DELTA_CYCLES: usize = 1000;

/// Configuration for a [`Network`](crate::Network)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Upper bound on delta steps in one `run_until_stable` call
    ///
    /// Clamped to at least 1.
    max_delta_cycles: usize,
    /// Wake sensitive processes even if an applied value equals the old one
    notify_unchanged_values: bool,
    /// Look up an architecture whenever a port becomes completely connected
    auto_link_architectures: bool,
}

impl NetworkConfig {
    /// Parse a configuration from RON text; missing fields take defaults
    pub fn from_ron(text: &str) -> Result<Self> {
        let mut config: NetworkConfig =
            ron::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.max_delta_cycles = config.max_delta_cycles.max(1);
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn max_delta_cycles(&self) -> usize {
        self.max_delta_cycles
    }

    pub fn set_max_delta_cycles(&mut self, n: usize) {
        self.max_delta_cycles = n.max(1);
    }

    pub fn with_max_delta_cycles(mut self, n: usize) -> Self {
        self.set_max_delta_cycles(n);
        self
    }

    pub fn notify_unchanged_values(&self) -> bool {
        self.notify_unchanged_values
    }

    pub fn set_notify_unchanged_values(&mut self, notify: bool) {
        self.notify_unchanged_values = notify;
    }

    pub fn auto_link_architectures(&self) -> bool {
        self.auto_link_architectures
    }

    pub fn set_auto_link_architectures(&mut self, auto_link: bool) {
        self.auto_link_architectures = auto_link;
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_delta_cycles: DEFAULT_MAX_DELTA_CYCLES,
            notify_unchanged_values: false,
            auto_link_architectures: true,
        }
    }
}
