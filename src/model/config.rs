use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration from bookpanel.toml. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub favicon: FaviconConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bookmark tree JSON file (relative paths resolve against the cwd)
    #[serde(default = "default_store_file")]
    pub file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

fn default_store_file() -> PathBuf {
    PathBuf::from("bookmarks.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Titles longer than this (in grapheme clusters) are shortened with `..`
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
    /// URL prefixes that are never rendered
    #[serde(default = "default_ignored_schemes")]
    pub ignored_schemes: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            max_title_length: default_max_title_length(),
            ignored_schemes: default_ignored_schemes(),
        }
    }
}

fn default_max_title_length() -> usize {
    22
}

fn default_ignored_schemes() -> Vec<String> {
    vec!["place:".to_string(), "data:".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaviconConfig {
    /// Remote icon service; the host name is appended
    #[serde(default = "default_favicon_service")]
    pub service: String,
    /// Use generic icons for everything
    #[serde(default)]
    pub offline: bool,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        FaviconConfig {
            service: default_favicon_service(),
            offline: false,
        }
    }
}

fn default_favicon_service() -> String {
    "https://favicons.githubusercontent.com/".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Delay before the single retry of a failed initial load
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_retry_delay_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Write logs here while the TUI owns the terminal
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub show_key_hints: bool,
    /// Theme overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}
