use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Where raw TEI text comes from. Loading is the only asynchronous step; the
/// returned buffer is handed to the synchronous pipeline.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self, location: &str) -> Result<String>;
}

pub struct FileSource;

#[async_trait]
impl DocumentSource for FileSource {
    async fn load(&self, location: &str) -> Result<String> {
        let bytes = tokio::fs::read(location).await?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Fetch(format!("{location} is not valid UTF-8: {e}")))
    }
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn load(&self, location: &str) -> Result<String> {
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("Network error fetching {location}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "HTTP error {} fetching {location}",
                response.status().as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("Error reading response body from {location}: {e}")))
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Picks the source for a command-line location: URLs over HTTP, anything
/// else from the file system.
pub fn source_for(location: &str, client: &Client) -> Box<dyn DocumentSource> {
    if is_remote(location) {
        Box::new(HttpSource::new(client.clone()))
    } else {
        Box::new(FileSource)
    }
}
