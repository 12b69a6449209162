use std::{env, fs, path::{Path, PathBuf}};

use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::Deserialize;
use serde_yaml::Deserializer;

const APP_NAME: &str = "scrappy";
const CONFIG_FILE: &str = "config.yaml";
const DATA_DIR: &str = ".scrappy";
const DB_FILE: &str = "scrappy_notes.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_level: LevelFilter,
}

// Every key is optional, a missing file means all defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    db_path: Option<PathBuf>,
    log_level: Option<String>,
}

impl Config {
    /// Loads `$XDG_CONFIG_HOME/scrappy/config.yaml` if present. The file is
    /// never created here.
    pub fn get_user_config() -> Result<Config> {
        let existing_config =
            xdg::BaseDirectories::with_prefix(APP_NAME).find_config_file(CONFIG_FILE);

        let raw = match &existing_config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                parse_raw(&text, &path.display().to_string())?
            }
            None => RawConfig::default(),
        };

        Config::from_raw(raw, home_dir)
    }

    fn from_raw(raw: RawConfig, home: impl Fn() -> Result<PathBuf>) -> Result<Config> {
        let db_path = match raw.db_path {
            Some(path) => resolve_db_path(&path, &home)?,
            None => home()?.join(DATA_DIR).join(DB_FILE),
        };

        let log_level = match raw.log_level {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("Invalid log_level `{}`", level))?,
            None => LevelFilter::Info,
        };

        Ok(Config { db_path, log_level })
    }
}

fn parse_raw(text: &str, source: &str) -> Result<RawConfig> {
    // an empty file deserializes as unit, treat it like an absent one
    if text.trim().is_empty() {
        return Ok(RawConfig::default());
    }

    let deserialized = Deserializer::from_str(text);
    serde_path_to_error::deserialize(deserialized).map_err(|e| {
        anyhow!(
            "Invalid YAML in {} at `{}`: {}",
            source,
            e.path(),
            e.inner()
        )
    })
}

// A leading `~` means the home directory; anything else must be absolute.
fn resolve_db_path(path: &Path, home: impl Fn() -> Result<PathBuf>) -> Result<PathBuf> {
    if let Ok(rest) = path.strip_prefix("~") {
        return Ok(home()?.join(rest));
    }

    if path.is_relative() {
        return Err(anyhow!(
            "db_path `{}` must be absolute or start with `~/`",
            path.display()
        ));
    }

    Ok(path.to_path_buf())
}

fn home_dir() -> Result<PathBuf> {
    env::home_dir().ok_or_else(|| anyhow!("Could not determine $HOME"))
}
