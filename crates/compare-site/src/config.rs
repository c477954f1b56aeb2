use std::path::{Path, PathBuf};

use crate::error::AppError;
use tool_data::dataset::{LEGACY_FILE, UNIFIED_FILE};

/// Application configuration loaded explicitly from environment variables.
///
/// Only the data directory is required. Everything else has a default suitable for a
/// local build; `listen_addr` enables the on-demand server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `aiToolsData.json`, `unifiedTools.json` and `faqData.json`.
    pub data_dir: String,
    /// Root of the generated site.
    pub out_dir: String,
    /// Absolute site origin used for canonical URLs, without trailing slash.
    pub site_url: String,
    pub site_name: String,
    pub year: String,
    /// Also write `/compare/<a>-vs-<b>/` pages next to the nested ones.
    pub hyphen_aliases: bool,
    /// Rebuild even when the data fingerprint matches the manifest.
    pub force_rebuild: bool,
    pub listen_addr: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `COMPARE_DATA_DIR`: path to the tool data directory
    ///
    /// Optional:
    /// - `COMPARE_OUT_DIR` (default: "out")
    /// - `COMPARE_SITE_URL` (default: "https://siteoptz.ai")
    /// - `COMPARE_SITE_NAME` (default: "SiteOptz")
    /// - `COMPARE_YEAR` (default: "2025")
    /// - `COMPARE_HYPHEN_ALIASES`, `COMPARE_FORCE_REBUILD`: "1" or "true" to enable
    /// - `COMPARE_LISTEN_ADDR`: serve the site and render unknown pairs on request
    pub fn from_env() -> Result<Self, AppError> {
        let data_dir = std::env::var("COMPARE_DATA_DIR").map_err(|_| {
            AppError::Config("COMPARE_DATA_DIR environment variable is required".to_string())
        })?;

        let legacy = Path::new(&data_dir).join(LEGACY_FILE);
        let unified = Path::new(&data_dir).join(UNIFIED_FILE);
        if !legacy.exists() && !unified.exists() {
            return Err(AppError::Config(format!(
                "no tool data found: {} (also checked {})",
                legacy.display(),
                unified.display()
            )));
        }

        Ok(Self {
            data_dir,
            out_dir: std::env::var("COMPARE_OUT_DIR").unwrap_or_else(|_| "out".to_string()),
            site_url: std::env::var("COMPARE_SITE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://siteoptz.ai".to_string()),
            site_name: std::env::var("COMPARE_SITE_NAME")
                .unwrap_or_else(|_| "SiteOptz".to_string()),
            year: std::env::var("COMPARE_YEAR").unwrap_or_else(|_| "2025".to_string()),
            hyphen_aliases: env_flag("COMPARE_HYPHEN_ALIASES"),
            force_rebuild: env_flag("COMPARE_FORCE_REBUILD"),
            listen_addr: std::env::var("COMPARE_LISTEN_ADDR").ok(),
        })
    }

    /// Configuration rooted at explicit directories, with defaults for everything else.
    #[cfg(test)]
    pub fn with_dirs(data_dir: impl Into<String>, out_dir: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
            site_url: "https://siteoptz.ai".to_string(),
            site_name: "SiteOptz".to_string(),
            year: "2025".to_string(),
            hyphen_aliases: false,
            force_rebuild: false,
            listen_addr: None,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).to_path_buf()
    }

    pub fn out_dir(&self) -> PathBuf {
        Path::new(&self.out_dir).to_path_buf()
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
