//! Configuration file loading.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{interval::IntervalKind, template::PathTemplate};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    pub sources: Vec<SourceConfig>,
}

fn default_regions() -> Vec<String> {
    vec!["global".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default)]
    pub protocol: Protocol,
    pub base_url: String,
    pub path_template: String,
    pub interval: IntervalKind,
    pub begin_date: NaiveDate,
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    pub variables: Vec<String>,
    #[serde(default)]
    pub filter: Option<String>,
    /// List remote directories instead of rendering file names.
    #[serde(default)]
    pub listing: bool,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Local,
}

#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

impl Config {
    /// Directory downloads are written to, `$HOME/geosync` unless configured.
    pub fn download_dir(&self) -> Result<PathBuf> {
        match &self.download_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join("geosync"))
                .context("Could not determine home directory"),
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("geosync").join("config.toml"))
        .context("Could not determine configuration directory")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.sources.is_empty() {
        bail!("at least one [[sources]] entry is required");
    }

    let mut names = HashSet::new();
    for source in &config.sources {
        if !names.insert(source.name.as_str()) {
            bail!("duplicate source name '{}'", source.name);
        }
        if source.base_url.trim().is_empty() {
            bail!("sources.{}.base_url must not be empty", source.name);
        }
        if source.variables.is_empty() {
            bail!("sources.{}.variables must list at least one variable", source.name);
        }
        if matches!(&source.regions, Some(regions) if regions.is_empty()) {
            bail!("sources.{}.regions must not be empty when given", source.name);
        }
        source
            .path_template
            .parse::<PathTemplate>()
            .with_context(|| format!("sources.{}.path_template is invalid", source.name))?;
    }

    if config.regions.is_empty() {
        bail!("regions must not be empty");
    }

    Ok(config)
}

// -- Tests -------------------------------------------------------------------
