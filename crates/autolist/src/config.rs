use anyhow::{Context, Result};
use directories::ProjectDirs;
use listcore::MarkerFamily;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::try_exists;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub enabled: bool,
    /// Insert the next marker when a line break is typed in a list item.
    pub continue_on_enter: bool,
    /// Renumber the following items when a deletion merges lines.
    pub renumber_on_delete: bool,
    /// Marker families to recognize, in any order.
    #[serde(default = "all_families")]
    pub families: Vec<MarkerFamily>,
}

fn all_families() -> Vec<MarkerFamily> {
    MarkerFamily::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            continue_on_enter: true,
            renumber_on_delete: true,
            families: all_families(),
        }
    }
}

/// What was found at the config path.
enum Stored {
    Missing,
    Empty,
    Broken(serde_json::Error),
    Valid(Config),
}

impl Config {
    /// Loads settings from [`Config::config_path`], or defaults when no
    /// config directory is known.
    pub async fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path).await,
            None => Ok(Self::default()),
        }
    }

    /// Loads settings from `path`. A missing, empty or unparsable file is
    /// replaced by the defaults; an unparsable one is first copied to
    /// `<name>.bak`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        match Self::read(path).await? {
            Stored::Valid(mut config) => {
                config.validate();
                log::info!("Loaded list settings from {}", path.display());
                return Ok(config);
            }
            Stored::Missing => log::info!("No settings at {}, writing defaults", path.display()),
            Stored::Empty => log::warn!("Settings file {} is empty, writing defaults", path.display()),
            Stored::Broken(err) => {
                log::error!("Cannot parse {}: {}", path.display(), err);
                let backup = path.with_extension("bak");
                match tokio::fs::copy(path, &backup).await {
                    Ok(_) => log::info!("Kept the unreadable settings as {}", backup.display()),
                    Err(e) => log::warn!("Could not back up {}: {}", path.display(), e),
                }
            }
        }

        let config = Self::default();
        if let Err(e) = config.save_to(path).await {
            log::warn!("{:#}", e);
        }
        Ok(config)
    }

    async fn read(path: &Path) -> Result<Stored> {
        if !try_exists(path).await? {
            return Ok(Stored::Missing);
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Stored::Empty);
        }
        Ok(match serde_json::from_str(&content) {
            Ok(config) => Stored::Valid(config),
            Err(err) => Stored::Broken(err),
        })
    }

    pub async fn save(&self) -> Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path).await,
            None => Ok(()),
        }
    }

    /// Writes the validated settings as pretty JSON, creating parent
    /// directories as needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        let mut config = self.clone();
        config.validate();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        log::debug!("Saved list settings to {}", path.display());
        Ok(())
    }

    /// Drops duplicate families and falls back to all of them when none are
    /// left. Returns whether anything was corrected.
    pub fn validate(&mut self) -> bool {
        let before = self.families.len();
        let mut seen = Vec::with_capacity(before);
        for family in self.families.drain(..) {
            if seen.contains(&family) {
                log::warn!("Duplicate marker family {:?} in config", family);
            } else {
                seen.push(family);
            }
        }
        let mut corrected = seen.len() != before;
        self.families = seen;

        if self.families.is_empty() {
            log::warn!("No marker families enabled, using all");
            self.families = all_families();
            corrected = true;
        }
        corrected
    }

    /// `AUTOLIST_CONFIG_PATH`, else `config.json` in `AUTOLIST_CONFIG_DIR`,
    /// else the platform config directory.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("AUTOLIST_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("AUTOLIST_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "autolist", "autolist")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
