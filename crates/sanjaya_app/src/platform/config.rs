//! Optional RON configuration for the terminal app.
//!
//! Every field may be omitted; omitted fields keep the engine defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sanjaya_core::{RegistryEntry, TaskRegistry};
use sanjaya_engine::StreamSettings;
use sanjaya_logging::sanjaya_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "sanjaya.ron";
const DEFAULT_OUT_DIR: &str = "reports";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub max_line_bytes: Option<usize>,
    pub out_dir: Option<PathBuf>,
    /// Extra or replacement agent rows for the task registry.
    pub agents: Vec<RegistryEntry>,
}

impl AppConfig {
    /// Loads `explicit` if given (it must exist), else `./sanjaya.ron` if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        sanjaya_info!(
            "Loaded config from {:?} ({} extra agents)",
            path,
            config.agents.len()
        );
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    /// Engine settings: defaults, then this file, then the CLI endpoint.
    pub fn stream_settings(&self, endpoint_override: Option<&str>) -> StreamSettings {
        let defaults = StreamSettings::default();
        StreamSettings {
            endpoint: endpoint_override
                .map(str::to_string)
                .or_else(|| self.endpoint.clone())
                .unwrap_or(defaults.endpoint),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            read_timeout: self
                .read_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.read_timeout),
            max_line_bytes: self.max_line_bytes.unwrap_or(defaults.max_line_bytes),
        }
    }

    pub fn registry(&self) -> TaskRegistry {
        let mut registry = TaskRegistry::builtin();
        registry.extend(self.agents.iter().cloned());
        registry
    }

    pub fn out_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanjaya_core::Role;

    const SAMPLE: &str = r#"(
        endpoint: Some("http://backend:9000/api/chat"),
        read_timeout_secs: Some(30),
        agents: [
            (
                agent: "EXIM Trade Agent",
                task: (task_id: "exim", label: "Trade Data", icon: "🚢", role: None),
            ),
            (
                agent: "Web Intelligence Agent",
                task: (task_id: "web", label: "Web Signals", icon: "🌐", role: Some(web)),
            ),
        ],
    )"#;

    #[test]
    fn parses_partial_config() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://backend:9000/api/chat"));
        assert_eq!(config.connect_timeout_secs, None);
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[1].task.role, Some(Role::Web));
    }

    #[test]
    fn settings_layer_defaults_file_and_cli() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        let defaults = StreamSettings::default();

        let settings = config.stream_settings(None);
        assert_eq!(settings.endpoint, "http://backend:9000/api/chat");
        assert_eq!(settings.read_timeout, Duration::from_secs(30));
        assert_eq!(settings.connect_timeout, defaults.connect_timeout);

        let settings = config.stream_settings(Some("http://other/api/chat"));
        assert_eq!(settings.endpoint, "http://other/api/chat");
    }

    #[test]
    fn extra_agents_extend_registry() {
        let registry = AppConfig::parse(SAMPLE).unwrap().registry();
        assert_eq!(registry.lookup("EXIM Trade Agent").unwrap().task_id, "exim");
        assert_eq!(
            registry.lookup("Web Intelligence Agent").unwrap().label,
            "Web Signals"
        );
        assert!(registry.lookup("Clinical Trials Agent").is_some());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::parse("()").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.out_dir(None), PathBuf::from("reports"));
        assert_eq!(
            config.out_dir(Some(Path::new("elsewhere"))),
            PathBuf::from("elsewhere")
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.ron");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("sanjaya.ron");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.read_timeout_secs, Some(30));
    }
}
