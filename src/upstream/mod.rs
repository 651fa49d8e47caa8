use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// A single photo as served by the upstream catalog.
///
/// Constructed only by deserializing the upstream response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
}

/// Failures surfaced by the upstream photo catalog.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request never completed (connection refused, timeout, DNS).
    #[error("upstream request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}")]
    Status { status: StatusCode },

    /// The upstream signalled that the album does not exist.
    #[error("album {0} not found upstream")]
    AlbumNotFound(u64),

    /// The response body did not match the expected photo-list shape.
    #[error("upstream response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    /// The base URL and request path do not combine into a valid URL.
    #[error("invalid upstream request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Read access to the upstream photo catalog.
///
/// A trait seam so request handlers can be exercised against any catalog
/// implementation, while production wires in [`PhotoApiClient`].
#[async_trait]
pub trait PhotoCatalog: Send + Sync {
    /// Fetch all photos belonging to `album_id`, in upstream order.
    async fn fetch_photos(&self, album_id: u64) -> Result<Vec<Photo>, UpstreamError>;
}

/// HTTP implementation of [`PhotoCatalog`] backed by a configured base URL.
#[derive(Debug, Clone)]
pub struct PhotoApiClient {
    client: Client,
    base_url: Url,
}

impl PhotoApiClient {
    /// Build a client for the given catalog base URL.
    ///
    /// The base URL path is normalized to end with `/` so request paths
    /// join below it instead of replacing it.
    pub fn new(mut base_url: Url) -> Result<Self, UpstreamError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().build().map_err(UpstreamError::Transport)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PhotoCatalog for PhotoApiClient {
    #[instrument(skip(self))]
    async fn fetch_photos(&self, album_id: u64) -> Result<Vec<Photo>, UpstreamError> {
        let url = self.base_url.join(&format!("albums/{album_id}/photos"))?;
        debug!(%url, "requesting photos from upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::AlbumNotFound(album_id));
        }
        if !status.is_success() {
            return Err(UpstreamError::Status { status });
        }

        response
            .json::<Vec<Photo>>()
            .await
            .map_err(UpstreamError::Decode)
    }
}
