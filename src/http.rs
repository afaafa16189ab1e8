use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::{Result, SourceError},
    source::FileSource,
    types::FileRecord,
};

/// HTTP-backed file source
///
/// Fetches the listing from a remote endpoint that responds with a JSON
/// array of file entries, e.g.
/// `[{"name": "a.txt", "size": 12, "etag": "abc"}, ...]`.
/// Fields beyond `name` and `size` are carried through as record metadata.
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct WireEntry {
    name: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl HttpSource {
    /// Create a source for the given listing endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("source-registry/0.3")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn is_rate_limit_status(status: StatusCode) -> bool {
        status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
    }

    fn into_record(entry: WireEntry) -> FileRecord {
        FileRecord {
            name: entry.name,
            size: entry.size,
            metadata: entry.extra,
        }
    }
}

#[async_trait]
impl FileSource for HttpSource {
    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let entries: Vec<WireEntry> = response.json().await?;
                Ok(entries.into_iter().map(Self::into_record).collect())
            }
            status if Self::is_rate_limit_status(status) => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "rate limit exceeded".to_string());
                Err(SourceError::RateLimited { message })
            }
            status => {
                let message = format!(
                    "unexpected status {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                );
                Err(SourceError::InvalidStructure { message })
            }
        }
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
