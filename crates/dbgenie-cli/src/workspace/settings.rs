use std::time::Duration;

use dbgenie_core::{DEFAULT_NUM_ROWS, OutputFormat};
use serde::{Deserialize, Serialize};

use super::files::write_bytes_atomic;
use super::{WorkspacePaths, WorkspaceResult};

pub const SERVER_URL_ENV: &str = "DBGENIE_SERVER_URL";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base url of the generation service.
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub default_format: OutputFormat,
    pub default_rows: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: 300,
            default_format: OutputFormat::Csv,
            default_rows: DEFAULT_NUM_ROWS,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Apply the environment and command-line overrides, flag last.
    pub fn with_overrides(mut self, env_url: Option<String>, flag_url: Option<String>) -> Self {
        if let Some(url) = flag_url.or(env_url).filter(|url| !url.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        self
    }
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<Settings> {
    let path = paths.settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let settings: Settings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = Settings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

pub fn save_settings(paths: &WorkspacePaths, settings: &Settings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(&paths.settings_path(), encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = WorkspacePaths::new(dir.path().to_path_buf());

        let created = load_or_create_settings(&paths).expect("create settings");
        assert_eq!(created, Settings::default());
        assert!(paths.settings_path().exists());

        let mut changed = created.clone();
        changed.default_format = OutputFormat::Excel;
        changed.request_timeout_secs = 30;
        save_settings(&paths, &changed).expect("save settings");
        assert_eq!(load_or_create_settings(&paths).expect("load"), changed);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let settings: Settings =
            toml::from_str("server_url = \"http://gen:8080\"").expect("parse settings");
        assert_eq!(settings.server_url, "http://gen:8080");
        assert_eq!(settings.default_rows, DEFAULT_NUM_ROWS);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let base = Settings::default();
        let from_env = base
            .clone()
            .with_overrides(Some("http://env:1".into()), None);
        assert_eq!(from_env.server_url, "http://env:1");
        let from_flag = base
            .clone()
            .with_overrides(Some("http://env:1".into()), Some("http://flag:2".into()));
        assert_eq!(from_flag.server_url, "http://flag:2");
        assert_eq!(
            base.with_overrides(Some("  ".into()), None).server_url,
            DEFAULT_SERVER_URL
        );
    }
}
