//! Host configuration: carousel settings plus runtime knobs.

use std::path::Path;

use carousel_core::{CarouselConfig, ViewportClass};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{HostError, HostResult};

/// Default capacity of the input command channel.
const DEFAULT_COMMAND_BUFFER: usize = 32;

/// Configuration for a hosted carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    /// Carousel timing, gesture and window settings.
    pub carousel: CarouselConfig,
    /// Initial viewport class.
    pub viewport: ViewportClass,
    /// Capacity of the input command channel.
    pub command_buffer: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            carousel: CarouselConfig::default(),
            viewport: ViewportClass::Desktop,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl HostConfig {
    /// Load a configuration file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds out-of-range carousel settings.
    pub fn load(path: &Path) -> HostResult<Self> {
        let config: Self = read_json(path)?;
        config.carousel.validate()?;
        Ok(config)
    }

    /// Apply `CAROUSEL_*` environment overrides.
    ///
    /// Environment variables:
    /// - `CAROUSEL_INTERVAL_MS`: auto-advance interval
    /// - `CAROUSEL_SETTLE_MS`: settle duration
    /// - `CAROUSEL_COOLDOWN_MS`: resume cool-down
    /// - `CAROUSEL_DRAG_THRESHOLD_PX`: drag commit threshold
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = env_parse("CAROUSEL_INTERVAL_MS") {
            self.carousel.auto_advance_interval_ms = ms;
        }
        if let Some(ms) = env_parse("CAROUSEL_SETTLE_MS") {
            self.carousel.settle_duration_ms = ms;
        }
        if let Some(ms) = env_parse("CAROUSEL_COOLDOWN_MS") {
            self.carousel.resume_cooldown_ms = ms;
        }
        if let Some(px) = env_parse("CAROUSEL_DRAG_THRESHOLD_PX") {
            self.carousel.drag_threshold_px = px;
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

/// Read and parse a JSON file.
///
/// # Errors
///
/// Returns [`HostError::Io`] or [`HostError::Json`] naming the path.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> HostResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| HostError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| HostError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"viewport": "mobile", "carousel": {{"autoAdvanceIntervalMs": 4000}}}}"#
        )
        .expect("write");

        let config = HostConfig::load(file.path()).expect("valid config");
        assert_eq!(config.viewport, ViewportClass::Mobile);
        assert_eq!(config.carousel.auto_advance_interval_ms, 4000);
        assert_eq!(config.command_buffer, DEFAULT_COMMAND_BUFFER);
    }

    #[test]
    fn test_load_rejects_invalid_carousel_settings() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"carousel": {{"desktopWindow": 2}}}}"#).expect("write");
        assert!(matches!(
            HostConfig::load(file.path()),
            Err(HostError::Core(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HostConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, HostError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");
        assert!(matches!(
            HostConfig::load(file.path()),
            Err(HostError::Json { .. })
        ));
    }
}
