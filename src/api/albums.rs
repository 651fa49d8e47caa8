use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use tracing::instrument;

use crate::{
    api::{ApiError, ApiResult},
    routes::AppState,
    services::albums::Album,
};

/// `GET /api/albums/{albumId}`
///
/// Fetches the album's photos from the upstream catalog and returns the
/// assembled album. Upstream failures surface as 5xx envelopes; a
/// non-numeric album id is a 400.
#[instrument(skip(state))]
pub async fn get_album(
    State(state): State<AppState>,
    album_id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Album> {
    let Path(album_id) =
        album_id.map_err(|_| ApiError::bad_request("albumId must be a non-negative integer"))?;

    let album = state.albums.get_album(album_id).await?;
    Ok(Json(album))
}
