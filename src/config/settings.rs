//! Application settings

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime options read from `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Rows per page for paged collections
    pub page_size: usize,

    /// Theme name, `default` or `light`
    pub theme: String,

    /// Log level when a log file is configured
    pub log_level: String,

    /// Capture mouse events (header clicks, wheel scrolling)
    pub mouse_capture: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 50,
            theme: "default".to_string(),
            log_level: "info".to_string(),
            mouse_capture: true,
        }
    }
}

impl Settings {
    /// Read settings from `path` or the default location.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Self = serde_json::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Platform config directory, with a `~/.config` fallback.
    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("com", "datagrid", "datagrid-tui")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
                    .join("datagrid-tui")
            })
    }

    /// `config.json` inside [`Self::config_dir`].
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.theme, "default");
        assert_eq!(settings.log_level, "info");
        assert!(settings.mouse_capture);
    }

    #[test]
    fn parses_a_full_settings_file() {
        let settings: Settings = serde_json::from_str(
            r#"{"page_size": 10, "theme": "light", "log_level": "debug", "mouse_capture": false}"#,
        )
        .unwrap();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.theme, "light");
        assert!(!settings.mouse_capture);
    }
}
