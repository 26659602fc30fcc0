use std::path::{Path, PathBuf};

use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATA_DIR: &str = "data";

/// Every hour, on the hour.
const DEFAULT_STATUS_ROTATION_CRON: &str = "0 0 * * * *";

pub struct Config {
    pub discord_bot_token: String,
    pub data_dir: PathBuf,
    pub status_rotation_cron: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let discord_bot_token = std::env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?;

        if discord_bot_token.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                name: "DISCORD_BOT_TOKEN".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            discord_bot_token,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            status_rotation_cron: std::env::var("STATUS_ROTATION_CRON")
                .unwrap_or_else(|_| DEFAULT_STATUS_ROTATION_CRON.to_string()),
        })
    }
}

/// Directories below the data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
    /// `/select` working directories and archives
    pub selections: PathBuf,
    /// `emoji.json`, `role.json`
    pub settings: PathBuf,
    /// Sticky message state
    pub sticky: PathBuf,
    /// `/pfps` working directories and archives
    pub pfps: PathBuf,
    /// Unpacked Typst releases, one directory per version
    pub typst_exe: PathBuf,
    /// Unpacked script bundles, one directory per commit
    pub typst_script: PathBuf,
    /// `/showcase` working directories and rendered documents
    pub showcase: PathBuf,
}

impl DataPaths {
    pub fn new(root: &Path) -> Self {
        let typst = root.join("typst");

        Self {
            root: root.to_path_buf(),
            selections: root.join("selections"),
            settings: root.join("settings"),
            sticky: root.join("sticky"),
            pfps: root.join("pfps"),
            typst_exe: typst.join("exe"),
            typst_script: typst.join("script"),
            showcase: root.join("showcase"),
        }
    }

    /// Every directory, parents before children.
    pub fn all(&self) -> [&Path; 8] {
        [
            self.root.as_path(),
            self.selections.as_path(),
            self.settings.as_path(),
            self.sticky.as_path(),
            self.pfps.as_path(),
            self.typst_exe.as_path(),
            self.typst_script.as_path(),
            self.showcase.as_path(),
        ]
    }
}
