use axum::http::StatusCode;
use serde_json::json;

use super::support::{UpstreamStub, app, get_album, response_json};

#[tokio::test]
async fn fresh_stub_has_recorded_nothing() {
    let stub = UpstreamStub::start().await;

    stub.verify_photo_requests(1, 0).await;
    assert_eq!(stub.request_total().await, 0);
}

#[tokio::test]
async fn reset_clears_recorded_requests_and_expectations() {
    let stub = UpstreamStub::start().await;
    stub.stub_photos(
        1,
        json!([{"id": 51, "title": "t1", "url": "u1", "thumbnailUrl": "tu1"}]),
    )
    .await;
    let app = app(&stub);

    let (status, _) = response_json(get_album(&app, "1").await).await;
    assert_eq!(status, StatusCode::OK);
    stub.verify_photo_requests(1, 1).await;

    stub.reset().await;

    // Recorded request history is gone.
    stub.verify_photo_requests(1, 0).await;

    // The expectation is gone too: the stub now answers 404, which the
    // service surfaces as an unknown album.
    let (status, body) = response_json(get_album(&app, "1").await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn scenarios_on_separate_stubs_do_not_interfere() {
    let first = UpstreamStub::start().await;
    let second = UpstreamStub::start().await;
    first
        .stub_photos(
            1,
            json!([{"id": 51, "title": "t1", "url": "u1", "thumbnailUrl": "tu1"}]),
        )
        .await;
    second.stub_status(1, 500).await;

    let (ok_status, _) = response_json(get_album(&app(&first), "1").await).await;
    let (err_status, _) = response_json(get_album(&app(&second), "1").await).await;

    assert_eq!(ok_status, StatusCode::OK);
    assert_eq!(err_status, StatusCode::BAD_GATEWAY);
    first.verify_photo_requests(1, 1).await;
    second.verify_photo_requests(1, 1).await;
}

#[tokio::test]
async fn verification_is_scoped_to_the_matched_path() {
    let stub = UpstreamStub::start().await;
    stub.stub_photos(
        1,
        json!([{"id": 51, "title": "t1", "url": "u1", "thumbnailUrl": "tu1"}]),
    )
    .await;
    stub.stub_photos(2, json!([])).await;
    let app = app(&stub);

    let (status, _) = response_json(get_album(&app, "1").await).await;
    assert_eq!(status, StatusCode::OK);

    stub.verify_photo_requests(1, 1).await;
    stub.verify_photo_requests(2, 0).await;
}
