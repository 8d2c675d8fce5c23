//! # Container Configuration
//!
//! Tuning knobs for the toolkit, loaded once at startup from a TOML file.
//!
//! ```toml
//! set_linear_threshold = 17
//! storage_capacity = 1024
//! pool_capacity = 256
//! map_capacity = 64
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{MemoryError, MemoryResult};

/// Below this length a [`SortedSet`](crate::SortedSet) scans linearly
/// instead of bisecting. Benchmarked value.
pub const DEFAULT_LINEAR_THRESHOLD: usize = 17;

/// Capacity hints and thresholds shared by the containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Sorted set length below which lookup is a linear scan.
    pub set_linear_threshold: usize,
    /// Slots reserved up front by `SlotStorage::from_config`.
    pub storage_capacity: usize,
    /// Objects reserved up front by `QuickPool::from_config`.
    pub pool_capacity: usize,
    /// Entries reserved up front by `OrderedMap::from_config`.
    pub map_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            set_linear_threshold: DEFAULT_LINEAR_THRESHOLD,
            storage_capacity: 0,
            pool_capacity: 0,
            map_capacity: 0,
        }
    }
}

impl MemoryConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] on malformed TOML, unknown keys,
    /// or values rejected by [`MemoryConfig::validate`].
    pub fn from_toml_str(text: &str) -> MemoryResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MemoryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`MemoryConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> MemoryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MemoryError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded memory config");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidConfig`] if the set threshold is zero.
    pub fn validate(&self) -> MemoryResult<()> {
        if self.set_linear_threshold == 0 {
            return Err(MemoryError::InvalidConfig(
                "set_linear_threshold must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MemoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, MemoryConfig::default());
        assert_eq!(config.set_linear_threshold, DEFAULT_LINEAR_THRESHOLD);
    }

    #[test]
    fn test_config_partial_override() {
        let config =
            MemoryConfig::from_toml_str("storage_capacity = 4096\nset_linear_threshold = 8")
                .unwrap();
        assert_eq!(config.storage_capacity, 4096);
        assert_eq!(config.set_linear_threshold, 8);
        assert_eq!(config.pool_capacity, 0);
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let err = MemoryConfig::from_toml_str("slab_size = 3").unwrap_err();
        assert!(matches!(err, MemoryError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_rejects_zero_threshold() {
        let err = MemoryConfig::from_toml_str("set_linear_threshold = 0").unwrap_err();
        assert!(matches!(err, MemoryError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = MemoryConfig::load("/definitely/not/here/memory.toml").unwrap_err();
        assert!(matches!(err, MemoryError::Io(_)));
    }

    #[test]
    fn test_config_load_file() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("tessera_memory_{id}.toml"));
        std::fs::write(&path, "pool_capacity = 32\n").unwrap();

        let config = MemoryConfig::load(&path).unwrap();
        assert_eq!(config.pool_capacity, 32);

        std::fs::remove_file(&path).ok();
    }
}
