use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

use super::cache::DEFAULT_CACHE_TTL;
use super::collector::CollectorConfig;
use super::route::DEFAULT_JUMP_THRESHOLD_KM;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load a scan
/// setup without inventing their own ad-hoc format. Only `input_dir` is
/// required in JSON; every other field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEngineConfig {
    pub input_dir: PathBuf,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default = "default_jump_threshold_km")]
    pub jump_threshold_km: f64,
    #[serde(default)]
    pub cleaned_output_dir: Option<PathBuf>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_jump_threshold_km() -> f64 {
    DEFAULT_JUMP_THRESHOLD_KM
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL.as_secs()
}

impl ScanEngineConfig {
    /// Creates a config with defaults for everything but the input directory.
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            collector: CollectorConfig::default(),
            jump_threshold_km: default_jump_threshold_km(),
            cleaned_output_dir: None,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }

    /// Sets the capture file extension (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.collector.extension = extension.into();
        self
    }

    /// Restricts collection to files whose name starts with `prefix`.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.collector.file_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_jump_threshold_km(mut self, threshold_km: f64) -> Self {
        self.jump_threshold_km = threshold_km;
        self
    }

    /// Directory receiving `<stem>-cleaned.json` copies during a run.
    #[must_use]
    pub fn with_cleaned_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cleaned_output_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn validate(&self) -> ScanResult<()> {
        if !self.jump_threshold_km.is_finite() || self.jump_threshold_km <= 0.0 {
            return Err(ScanError::InvalidConfig(format!(
                "`jump_threshold_km` must be finite and > 0, got {}",
                self.jump_threshold_km
            )));
        }
        let extension = self.collector.extension.trim();
        if extension.is_empty() || extension.starts_with('.') {
            return Err(ScanError::InvalidConfig(
                "`collector.extension` must be non-empty and given without a leading dot"
                    .to_owned(),
            ));
        }
        if self.cleaned_output_dir.as_deref() == Some(self.input_dir.as_path()) {
            return Err(ScanError::InvalidConfig(
                "`cleaned_output_dir` must differ from `input_dir`".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ScanResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ScanError::InvalidConfig(format!("failed to parse config json: {e}")))
    }

    /// Loads a JSON config file.
    pub fn load(path: &Path) -> ScanResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| ScanError::io(path, err))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> ScanResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::InvalidData(format!("failed to serialize config: {e}")))
    }
}
