pub mod dates;
pub mod plan;
pub mod sync;

use std::path::Path;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use geosync::{
    config::{default_config_path, load_config, Config},
    source::SourceDescriptor,
};

pub use dates::dates;
pub use plan::plan;
pub use sync::sync;

use super::Target;

/// Loads the configuration and the sources selected by `target`.
pub fn load_sources(target: &Target) -> Result<(Config, Vec<SourceDescriptor>)> {
    let config = match &target.config {
        Some(path) => load_config(path)?,
        None => load_config(&default_config_path()?)?,
    };

    let sources = select_sources(&config, target.source.as_deref())?;

    Ok((config, sources))
}

fn select_sources(config: &Config, name: Option<&str>) -> Result<Vec<SourceDescriptor>> {
    let mut sources = Vec::new();

    for source in &config.sources {
        if name.map_or(true, |name| source.name.eq_ignore_ascii_case(name)) {
            sources.push(SourceDescriptor::from_config(source, &config.regions)?);
        }
    }

    if sources.is_empty() {
        if let Some(name) = name {
            bail!("No source named `{}` in the configuration", name);
        }
    }

    Ok(sources)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

// -- Tests -------------------------------------------------------------------
