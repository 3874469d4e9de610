use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::{FileSink, Logger};
use crate::reconciler::ReconcilerConfig;
use crate::render::RenderSettings;

use super::{DEFAULT_LOG_TARGET, RuntimeConfig};

const DEFAULT_LOG_MAX_BYTES: u64 = 1024 * 1024;

/// File-backed runtime settings.
///
/// ```json
/// {
///   "fallback": "<p>loading</p>",
///   "slot_fallbacks": { "header": "" },
///   "hydrate": true,
///   "log_path": "/tmp/widget_slots.jsonl",
///   "metrics": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub fallback: String,
    pub slot_fallbacks: HashMap<String, String>,
    pub hydrate: bool,
    pub log_path: Option<PathBuf>,
    pub log_max_bytes: u64,
    pub log_target: String,
    pub metrics: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            fallback: String::new(),
            slot_fallbacks: HashMap::new(),
            hydrate: true,
            log_path: None,
            log_max_bytes: DEFAULT_LOG_MAX_BYTES,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            metrics: false,
        }
    }
}

impl RuntimeSettings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Build a runtime config, opening the log file when one is configured.
    pub fn into_config(self) -> Result<RuntimeConfig> {
        let logger = match self.log_path.as_ref() {
            Some(path) => Some(Logger::new(FileSink::new(path, self.log_max_bytes)?)),
            None => None,
        };

        let mut config = RuntimeConfig {
            reconciler: ReconcilerConfig {
                fallback: self.fallback,
                slot_fallbacks: self.slot_fallbacks,
                render: RenderSettings {
                    hydrate: self.hydrate,
                },
            },
            logger,
            log_target: self.log_target,
            ..RuntimeConfig::default()
        };
        if self.metrics {
            config.enable_metrics();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlotError;

    #[test]
    fn missing_keys_use_defaults() {
        let settings = RuntimeSettings::from_json_str(r#"{"fallback":"<i>wait</i>"}"#).unwrap();
        assert_eq!(settings.fallback, "<i>wait</i>");
        assert!(settings.hydrate);
        assert_eq!(settings.log_max_bytes, DEFAULT_LOG_MAX_BYTES);
        assert_eq!(settings.log_target, DEFAULT_LOG_TARGET);
    }

    #[test]
    fn invalid_json_is_a_settings_error() {
        let err = RuntimeSettings::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, SlotError::Settings(_)));
    }

    #[test]
    fn into_config_wires_reconciler_and_metrics() {
        let settings = RuntimeSettings::from_json_str(
            r#"{"fallback":"f","slot_fallbacks":{"header":"h"},"hydrate":false,"metrics":true}"#,
        )
        .unwrap();
        let config = settings.into_config().unwrap();

        assert_eq!(config.reconciler.fallback_for("header"), "h");
        assert_eq!(config.reconciler.fallback_for("footer"), "f");
        assert!(!config.reconciler.render.hydrate);
        assert!(config.metrics_handle().is_some());
        assert!(config.logger.is_none());
    }

    #[test]
    fn from_path_reads_file_and_opens_log() {
        let dir = std::env::temp_dir();
        let stamp = std::process::id();
        let settings_path = dir.join(format!("widget_slots_settings_{stamp}.json"));
        let log_path = dir.join(format!("widget_slots_settings_{stamp}.jsonl"));
        let raw = serde_json::json!({ "log_path": log_path }).to_string();
        fs::write(&settings_path, raw).unwrap();

        let config = RuntimeSettings::from_path(&settings_path)
            .unwrap()
            .into_config()
            .unwrap();
        assert!(config.logger.is_some());
        assert!(log_path.exists());

        let _ = fs::remove_file(&settings_path);
        let _ = fs::remove_file(&log_path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RuntimeSettings::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SlotError::Io(_)));
    }
}
