//! Data-driven description of a remote archive.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{
    config::{Credentials, Protocol, SourceConfig},
    interval::IntervalKind,
    plan::SubStream,
    template::PathTemplate,
};

/// Everything needed to synchronise one archive.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub name: String,
    pub protocol: Protocol,
    pub base_url: String,
    pub interval: IntervalKind,
    pub template: PathTemplate,
    /// Earliest date the archive publishes.
    pub begin_date: NaiveDate,
    pub regions: Vec<String>,
    pub variables: Vec<String>,
    pub filter: Option<String>,
    pub listing: bool,
    pub credentials: Option<Credentials>,
}

impl SourceDescriptor {
    pub fn from_config(config: &SourceConfig, default_regions: &[String]) -> Result<Self> {
        let template = config
            .path_template
            .parse::<PathTemplate>()
            .with_context(|| format!("Invalid path template for source {}", config.name))?;
        let interval = config
            .interval
            .validate()
            .with_context(|| format!("Invalid interval for source {}", config.name))?;

        Ok(SourceDescriptor {
            name: config.name.clone(),
            protocol: config.protocol,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interval,
            template,
            begin_date: config.begin_date,
            regions: config
                .regions
                .clone()
                .unwrap_or_else(|| default_regions.to_vec()),
            variables: config.variables.clone(),
            filter: config.filter.clone(),
            listing: config.listing,
            credentials: config.credentials.clone(),
        })
    }

    /// All (region, variable) combinations, in configuration order.
    pub fn streams(&self) -> Vec<SubStream> {
        self.regions
            .iter()
            .flat_map(|region| {
                self.variables
                    .iter()
                    .map(move |variable| SubStream::new(region.as_str(), variable.as_str()))
            })
            .collect()
    }

    /// Remote path, relative to `base_url`, of the file for `date`.
    pub fn path_for(&self, date: NaiveDate, stream: &SubStream) -> String {
        self.template.render(date, stream)
    }

    pub fn local_dir(&self, download_dir: &Path) -> PathBuf {
        download_dir.join(&self.name)
    }

    /// Local file a remote path is stored under. The remote directory layout
    /// is mirrored below `local_dir`, so streams that differ only in a
    /// directory never share a file.
    pub fn local_target(&self, download_dir: &Path, remote_path: &str) -> PathBuf {
        remote_path
            .split('/')
            .filter(|part| !matches!(*part, "" | "." | ".."))
            .fold(self.local_dir(download_dir), |path, part| path.join(part))
    }

    /// Applies the optional file name filter.
    pub fn accepts(&self, file_name: &str) -> bool {
        match &self.filter {
            Some(filter) => file_name.contains(filter.as_str()),
            None => true,
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn tamsat() -> SourceDescriptor {
        let config = parse_config(
            r#"
regions = ["ETH", "KEN"]

[[sources]]
name = "TAMSAT"
base_url = "http://www.met.reading.ac.uk/~tamsat/public_data/"
path_template = "{YYYY}/{MM}/rfe{YYYY}_{MM}-dk{P}.nc"
interval = "dekadal"
begin_date = "1983-01-01"
variables = ["rfe", "anom"]
filter = "rfe"
"#,
        )
        .unwrap();

        SourceDescriptor::from_config(&config.sources[0], &config.regions).unwrap()
    }

    #[test]
    fn should_build_streams_from_regions_and_variables() {
        let source = tamsat();
        let streams = source.streams();

        assert_eq!(streams.len(), 4);
        assert_eq!(streams[0], SubStream::new("ETH", "rfe"));
        assert_eq!(streams[3], SubStream::new("KEN", "anom"));
    }

    #[test]
    fn should_map_dates_to_remote_and_local_paths() {
        let source = tamsat();
        let stream = SubStream::new("ETH", "rfe");
        let date = NaiveDate::from_ymd_opt(2004, 2, 20).unwrap();

        let remote = source.path_for(date, &stream);
        assert_eq!(remote, "2004/02/rfe2004_02-dk2.nc");
        assert_eq!(source.base_url, "http://www.met.reading.ac.uk/~tamsat/public_data");
        assert_eq!(
            source.local_target(Path::new("/data"), &remote),
            PathBuf::from("/data/TAMSAT/2004/02/rfe2004_02-dk2.nc")
        );
        assert_eq!(
            source.local_target(Path::new("/data"), "/../x/./a.nc"),
            PathBuf::from("/data/TAMSAT/x/a.nc")
        );
    }

    #[test]
    fn should_filter_file_names() {
        let source = tamsat();

        assert!(source.accepts("rfe2004_02-dk2.nc"));
        assert!(!source.accepts("anom2004_02-dk2.nc"));
    }
}
