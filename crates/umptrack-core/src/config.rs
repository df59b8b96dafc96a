//! Application configuration management.
//!
//! This module handles loading the application configuration, which holds
//! the Distance Matrix API key, the home-base address distances are measured
//! from, the database location and the site/league reference data.
//!
//! Configuration is stored at `~/.config/umptrack/config.json`. The
//! `UMPTRACK_CONFIG` environment variable points at a different file, and
//! `UMPTRACK_API_KEY` / `UMPTRACK_HOME_BASE` override the two credentials.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{LeagueRate, LeagueTable, ReferenceTables, SiteTable};

/// Application name used for config/data directory paths
const APP_NAME: &str = "umptrack";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Database file name
const DATABASE_FILE: &str = "officiating.db";

const CONFIG_PATH_ENV: &str = "UMPTRACK_CONFIG";
const API_KEY_ENV: &str = "UMPTRACK_API_KEY";
const HOME_BASE_ENV: &str = "UMPTRACK_HOME_BASE";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub home_base: Option<String>,
    pub database_path: Option<PathBuf>,
    /// Site name -> street address
    #[serde(default)]
    pub sites: BTreeMap<String, String>,
    /// League overrides and additions on top of the built-in table
    #[serde(default)]
    pub leagues: BTreeMap<String, LeagueRate>,
}

/// The two settings the tracker cannot start without.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub home_base: String,
}

impl Config {
    /// Load from the default location (or `UMPTRACK_CONFIG`), then apply
    /// environment overrides. A missing file yields an empty config.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_path()?,
        };
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the database and log files
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    fn apply_env(&mut self) {
        if let Some(key) = non_empty_env(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(home) = non_empty_env(HOME_BASE_ENV) {
            self.home_base = Some(home);
        }
    }

    /// The API key and home base, or an error naming what is missing
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = required(&self.api_key, "api_key", API_KEY_ENV)?;
        let home_base = required(&self.home_base, "home_base", HOME_BASE_ENV)?;
        Ok(Credentials { api_key, home_base })
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match self.database_path {
            Some(ref path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join(DATABASE_FILE)),
        }
    }

    /// Built-in leagues with config overrides applied, plus configured sites
    pub fn references(&self) -> ReferenceTables {
        let mut leagues = LeagueTable::builtin();
        for (league, rate) in &self.leagues {
            leagues.insert(league, rate.clone());
        }
        let sites: SiteTable = self
            .sites
            .iter()
            .map(|(name, address)| (name.clone(), address.clone()))
            .collect();
        ReferenceTables::new(leagues, sites)
    }
}

fn required(value: &Option<String>, key: &str, env: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Missing required setting '{}' (config file or {})", key, env))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
