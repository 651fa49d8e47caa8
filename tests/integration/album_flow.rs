use axum::http::StatusCode;
use serde_json::json;

use super::support::{UpstreamStub, app, get_album, response_json};

#[tokio::test]
async fn returns_album_with_photos_from_upstream() {
    let stub = UpstreamStub::start().await;
    stub.stub_photos(
        1,
        json!([{"id": 51, "title": "t1", "url": "u1", "thumbnailUrl": "tu1"}]),
    )
    .await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "1").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "albumId": 1,
            "photos": [{"id": 51, "title": "t1", "url": "u1", "thumbnailUrl": "tu1"}]
        })
    );
    stub.verify_photo_requests(1, 1).await;
}

#[tokio::test]
async fn preserves_upstream_photo_order() {
    let stub = UpstreamStub::start().await;
    stub.stub_photos(
        3,
        json!([
            {"id": 30, "title": "c", "url": "uc", "thumbnailUrl": "tc"},
            {"id": 10, "title": "a", "url": "ua", "thumbnailUrl": "ta"},
            {"id": 20, "title": "b", "url": "ub", "thumbnailUrl": "tb"}
        ]),
    )
    .await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "3").await).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body["photos"]
        .as_array()
        .expect("photos array")
        .iter()
        .map(|photo| photo["id"].as_u64().expect("photo id"))
        .collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[tokio::test]
async fn empty_upstream_album_yields_empty_photo_list() {
    let stub = UpstreamStub::start().await;
    stub.stub_photos(4, json!([])).await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "4").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"albumId": 4, "photos": []}));
}

#[tokio::test]
async fn upstream_server_error_produces_error_envelope() {
    let stub = UpstreamStub::start().await;
    stub.stub_status(2, 500).await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "2").await).await;

    assert!(!status.is_success(), "endpoint must not return 2xx");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "BAD_GATEWAY");
    assert!(body.get("photos").is_none(), "no partial photo payload");
    stub.verify_photo_requests(2, 1).await;
}

#[tokio::test]
async fn malformed_upstream_body_produces_error_envelope() {
    let stub = UpstreamStub::start().await;
    stub.stub_raw_body(6, "{\"definitely\": \"not a photo array\"").await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "6").await).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "BAD_GATEWAY");
    assert!(body.get("photos").is_none());
}

#[tokio::test]
async fn unknown_album_maps_upstream_404_to_not_found() {
    let stub = UpstreamStub::start().await;
    stub.stub_status(77, 404).await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "77").await).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn each_invocation_calls_upstream_once() {
    let stub = UpstreamStub::start().await;
    stub.stub_photos(
        5,
        json!([{"id": 1, "title": "t", "url": "u", "thumbnailUrl": "tu"}]),
    )
    .await;
    let app = app(&stub);

    for _ in 0..3 {
        let (status, _) = response_json(get_album(&app, "5").await).await;
        assert_eq!(status, StatusCode::OK);
    }

    // No caching between invocations.
    stub.verify_photo_requests(5, 3).await;
}

#[tokio::test]
async fn non_numeric_album_id_never_reaches_upstream() {
    let stub = UpstreamStub::start().await;
    let app = app(&stub);

    let (status, body) = response_json(get_album(&app, "not-a-number").await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(
        stub.request_total().await,
        0,
        "validation failures must not hit the upstream"
    );
}
