use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::upstream::{Photo, PhotoCatalog, UpstreamError};

/// An album identifier paired with the photos the upstream holds for it.
///
/// Assembled once per request; photo order matches the upstream response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub album_id: u64,
    pub photos: Vec<Photo>,
}

/// Assembles albums from the upstream photo catalog.
pub struct AlbumService {
    catalog: Arc<dyn PhotoCatalog>,
}

impl AlbumService {
    pub fn new(catalog: Arc<dyn PhotoCatalog>) -> Self {
        Self { catalog }
    }

    /// Fetch the photos for `album_id` and wrap them into an [`Album`].
    ///
    /// Issues exactly one upstream call per invocation; an empty photo list
    /// is a valid album.
    #[instrument(skip(self))]
    pub async fn get_album(&self, album_id: u64) -> Result<Album, UpstreamError> {
        let photos = self.catalog.fetch_photos(album_id).await?;
        Ok(Album { album_id, photos })
    }
}
