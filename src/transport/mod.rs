//! Transports that move files from a remote archive to the local disk.

pub mod http;
pub mod local;

use std::{collections::BTreeSet, path::Path, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;

use crate::{config::Protocol, source::SourceDescriptor};

pub use http::HttpTransport;
pub use local::LocalTransport;

/// Result of fetching a single remote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was written to the target path.
    Downloaded { bytes: u64 },
    /// The archive has not published this file.
    NotFound,
}

/// Access to one remote archive.
///
/// Paths are relative to the archive root. Implementations do not retry;
/// failures are returned to the caller as they happen.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable label identifying the archive.
    fn label(&self) -> &str;

    /// Downloads `remote_path` into `target`, replacing any partial file.
    async fn fetch(&self, remote_path: &str, target: &Path) -> Result<FetchOutcome>;

    /// Names of the files directly inside `directory`. A directory the archive
    /// does not have lists as empty.
    async fn list_remote(&self, directory: &str) -> Result<BTreeSet<String>>;
}

/// Builds the transport matching the protocol of `source`.
pub fn connect(source: &SourceDescriptor) -> Result<Arc<dyn Transport>> {
    let transport: Arc<dyn Transport> = match source.protocol {
        Protocol::Http => Arc::new(HttpTransport::new(
            &source.base_url,
            source.credentials.clone(),
        )?),
        Protocol::Local => Arc::new(LocalTransport::new(&source.base_url)),
    };

    Ok(transport)
}
