use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE: &str = "bookpanel.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load the config. An explicit path must exist; otherwise `bookpanel.toml`
/// in `cwd` is used when present, and defaults when not.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE);
            if !candidate.exists() {
                return Ok(AppConfig::default());
            }
            candidate
        }
    };
    read_config(&path)
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.display.max_title_length, 22);
        assert_eq!(config.display.ignored_schemes, vec!["place:", "data:"]);
        assert_eq!(config.load.retry_delay_ms, 250);
        assert_eq!(config.store.file, PathBuf::from("bookmarks.json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[display]\nmax_title_length = 30\n\n[favicon]\noffline = true\n",
        )
        .unwrap();

        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.display.max_title_length, 30);
        assert_eq!(config.display.ignored_schemes, vec!["place:", "data:"]);
        assert!(config.favicon.offline);
        assert_eq!(
            config.favicon.service,
            "https://favicons.githubusercontent.com/"
        );
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("custom.toml")), tmp.path());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[display\nmax_title_length = ").unwrap();
        assert!(matches!(
            read_config(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn ui_colors_keep_file_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[ui.colors]\nhighlight = \"#FF0000\"\nbackground = \"#000000\"\n",
        )
        .unwrap();
        let config = read_config(&path).unwrap();
        let keys: Vec<&str> = config.ui.colors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["highlight", "background"]);
    }
}
