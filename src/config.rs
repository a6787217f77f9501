//! Configuration for the normalization service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HassyError, Result};

/// File name of the variant source inside a data directory.
pub const VARIANTS_FILE: &str = "hassaniya_variants.jsonl";

/// File name of the exception source inside a data directory.
pub const EXCEPTIONS_FILE: &str = "exception_words_g_q.json";

/// Environment variable selecting the data directory.
pub const DATA_DIR_ENV: &str = "HASSY_DATA_DIR";

/// Environment variable overriding the maximum input length.
pub const MAX_TEXT_LENGTH_ENV: &str = "HASSY_MAX_TEXT_LENGTH";

/// Default maximum input length in characters.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 10_000;

/// Configuration for [`crate::service::HassyService`] and its parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HassyConfig {
    /// Path of the JSON Lines variant source.
    pub variants_path: PathBuf,

    /// Path of the JSON exception source.
    pub exceptions_path: PathBuf,

    /// Maximum accepted input length, in characters.
    pub max_text_length: usize,

    /// Total number of cached words across all shards. Zero disables the cache.
    pub cache_capacity: usize,

    /// Number of independently locked cache shards.
    pub cache_shards: usize,

    /// Minimum time between two checks of the data files for changes.
    #[serde(with = "duration_millis")]
    pub reload_check_interval: Duration,

    /// Register the `ه` spelling of every exception ending in `ة`, and the reverse.
    pub expand_taa_marbuta_exceptions: bool,
}

impl Default for HassyConfig {
    fn default() -> Self {
        Self {
            variants_path: PathBuf::from("data").join(VARIANTS_FILE),
            exceptions_path: PathBuf::from("data").join(EXCEPTIONS_FILE),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            cache_capacity: 100_000,
            cache_shards: num_cpus::get().max(1),
            reload_check_interval: Duration::from_secs(5),
            expand_taa_marbuta_exceptions: true,
        }
    }
}

impl HassyConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HassyError::invalid_config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: HassyConfig = serde_json::from_str(&content).map_err(|e| {
            HassyError::invalid_config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HASSY_DATA_DIR` and `HASSY_MAX_TEXT_LENGTH` if they are set.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV)
            && !dir.is_empty()
        {
            self = self.with_data_dir(dir);
        }
        if let Ok(raw) = std::env::var(MAX_TEXT_LENGTH_ENV) {
            let limit = raw.trim().parse::<usize>().map_err(|e| {
                HassyError::invalid_config(format!("{MAX_TEXT_LENGTH_ENV}='{raw}': {e}"))
            })?;
            self.max_text_length = limit;
        }
        self.validate()?;
        Ok(self)
    }

    /// Point both data paths at the standard file names inside `dir`.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        self.variants_path = dir.join(VARIANTS_FILE);
        self.exceptions_path = dir.join(EXCEPTIONS_FILE);
        self
    }

    /// Set the variant source path.
    pub fn with_variants_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.variants_path = path.into();
        self
    }

    /// Set the exception source path.
    pub fn with_exceptions_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.exceptions_path = path.into();
        self
    }

    /// Set the maximum input length in characters.
    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    /// Set the cache capacity (0 disables caching).
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Set the number of cache shards.
    pub fn with_cache_shards(mut self, cache_shards: usize) -> Self {
        self.cache_shards = cache_shards;
        self
    }

    /// Set the minimum interval between data file checks.
    pub fn with_reload_check_interval(mut self, interval: Duration) -> Self {
        self.reload_check_interval = interval;
        self
    }

    /// Enable or disable `ة`/`ه` expansion of exception words.
    pub fn with_taa_marbuta_expansion(mut self, enabled: bool) -> Self {
        self.expand_taa_marbuta_exceptions = enabled;
        self
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_text_length == 0 {
            return Err(HassyError::invalid_config(
                "max_text_length must be greater than 0",
            ));
        }
        if self.cache_shards == 0 {
            return Err(HassyError::invalid_config(
                "cache_shards must be greater than 0",
            ));
        }
        Ok(())
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
