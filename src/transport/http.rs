//! Downloads files over HTTP(S).

use std::{
    collections::BTreeSet,
    io::Write,
    path::Path,
    time::Duration,
};

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, StatusCode};
use tempfile::NamedTempFile;

use super::{FetchOutcome, Transport};
use crate::config::Credentials;

pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, remote_path: &str) -> String {
        format!("{}/{}", self.base_url, remote_path.trim_start_matches('/'))
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.credentials {
            Some(c) => request.basic_auth(&c.username, Some(&c.password)),
            None => request,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn label(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, remote_path: &str, target: &Path) -> Result<FetchOutcome> {
        let url = self.url(remote_path);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::msg(format!("Failed to download {}: {}", url, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !response.status().is_success() {
            return Err(Error::msg(format!(
                "Failed to download {}: {}",
                url,
                response.status()
            )));
        }

        // Partial transfers never appear under the target name.
        let directory = target
            .parent()
            .context("Download target has no parent directory")?;
        let mut file = NamedTempFile::new_in(directory)?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| Error::msg(format!("Error reading chunk: {}", e)))?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
        }

        file.persist(target)
            .with_context(|| format!("Failed to save {}", target.display()))?;

        Ok(FetchOutcome::Downloaded { bytes: downloaded })
    }

    async fn list_remote(&self, directory: &str) -> Result<BTreeSet<String>> {
        let url = format!("{}/", self.url(directory).trim_end_matches('/'));
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::msg(format!("Failed to list {}: {}", url, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(BTreeSet::new());
        }
        if !response.status().is_success() {
            return Err(Error::msg(format!("Failed to list {}: {}", url, response.status())));
        }

        let page = response.text().await?;

        Ok(index_entries(&page))
    }
}

/// Extracts the file links of an HTML directory index.
fn index_entries(page: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = page;

    while let Some(start) = rest.find("href=\"") {
        rest = &rest[start + 6..];
        let Some(end) = rest.find('"') else {
            break;
        };
        let target = &rest[..end];
        rest = &rest[end + 1..];

        // Parent links, sort links, subdirectories and absolute URLs.
        if target.is_empty()
            || target.starts_with(['?', '#', '/', '.'])
            || target.ends_with('/')
            || target.contains(':')
            || target.contains('/')
        {
            continue;
        }

        match percent_decode(target) {
            Some(name) if !name.contains('/') => {
                names.insert(name);
            }
            _ => {}
        }
    }

    names
}

/// Decodes `%XX` escapes. Returns `None` for malformed escapes or names that
/// are not UTF-8.
fn percent_decode(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).ok()
}

// -- Tests -------------------------------------------------------------------
