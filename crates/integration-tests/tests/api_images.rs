//! HTTP surface tests: routing, auth extraction, multipart parsing, and
//! error mapping, with the outbound ports mocked.

use std::sync::Arc;

use api_adapters::{router, AppState};
use auth_adapters::HashedTokenIdentity;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use domains::{AppError, MockObjectStore, MockVisionTagger};
use integration_tests::stored_object;
use serde_json::Value;
use services::IngestionPipeline;
use storage_adapters::InMemoryMetadataStore;
use tower::ServiceExt;

const BOUNDARY: &str = "picstash-test-boundary";

fn app(store: MockObjectStore, tagger: MockVisionTagger) -> axum::Router {
    let meta = Arc::new(InMemoryMetadataStore::new());
    router(AppState {
        pipeline: IngestionPipeline::new(Arc::new(store), meta.clone(), Arc::new(tagger)),
        meta,
        identity: Arc::new(HashedTokenIdentity::new("test-salt")),
    })
}

fn happy_app() -> axum::Router {
    let mut store = MockObjectStore::new();
    store
        .expect_put()
        .returning(|_, filename, _| Ok(stored_object(&format!("1700000000000-{filename}"))));
    let mut tagger = MockVisionTagger::new();
    tagger.expect_tag().returning(|_, _| Ok(vec!["cat".into()]));
    app(store, tagger)
}

fn multipart_upload(filename: &str, token: Option<&str>) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         fake jpeg bytes\r\n\
         --{BOUNDARY}--\r\n"
    );
    let mut request = Request::builder()
        .method("POST")
        .uri("/images")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    request.body(Body::from(body)).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn upload_without_bearer_token_is_unauthorized() {
    let response = happy_app()
        .oneshot(multipart_upload("cat.jpg", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_persists_and_returns_the_record() {
    let app = happy_app();
    let response = app
        .clone()
        .oneshot(multipart_upload("red-car.jpg", Some("tok")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Upload successful");
    assert_eq!(body["data"]["filename"], "red-car.jpg");
    // Baseline tags from the filename plus the mocked AI tag.
    assert_eq!(
        body["data"]["tags"],
        serde_json::json!(["red", "car", "cat"])
    );

    // The record is visible through the listing under the same token.
    let listing = app
        .oneshot(
            Request::builder()
                .uri("/images")
                .header(header::AUTHORIZATION, "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    let listed = json_body(listing).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn upload_without_a_file_field_is_a_bad_request() {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"note\"\r\n\r\n\
         not an image\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/images")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, "Bearer tok")
        .body(Body::from(body))
        .unwrap();

    let response = happy_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "validation error: no image file provided");
}

#[tokio::test]
async fn storage_rejection_maps_to_bad_gateway() {
    let mut store = MockObjectStore::new();
    store.expect_put().returning(|_, _, _| {
        Err(AppError::UpstreamRejection {
            status: 403,
            body: "SignatureDoesNotMatch".into(),
        })
    });
    let response = app(store, MockVisionTagger::new())
        .oneshot(multipart_upload("cat.jpg", Some("tok")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn search_requires_the_query_parameter() {
    let response = happy_app()
        .oneshot(
            Request::builder()
                .uri("/search")
                .header(header::AUTHORIZATION, "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_finds_uploaded_images_by_tag() {
    let app = happy_app();
    app.clone()
        .oneshot(multipart_upload("holiday-beach.jpg", Some("tok")))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?query=beach")
                .header(header::AUTHORIZATION, "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["images"][0]["filename"], "holiday-beach.jpg");
}

#[tokio::test]
async fn blank_query_returns_the_full_listing() {
    let app = happy_app();
    app.clone()
        .oneshot(multipart_upload("one.jpg", Some("tok")))
        .await
        .unwrap();
    app.clone()
        .oneshot(multipart_upload("two.jpg", Some("tok")))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?query=%20%20")
                .header(header::AUTHORIZATION, "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn patch_toggles_flags_and_hides_from_listing() {
    let app = happy_app();
    let upload = app
        .clone()
        .oneshot(multipart_upload("cat.jpg", Some("tok")))
        .await
        .unwrap();
    let uploaded = json_body(upload).await;
    let id = uploaded["data"]["id"].as_str().unwrap().to_string();

    let patch = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/images/{id}"))
                .header(header::AUTHORIZATION, "Bearer tok")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"hidden":true}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(patch.status(), StatusCode::OK);

    let listing = app
        .oneshot(
            Request::builder()
                .uri("/images")
                .header(header::AUTHORIZATION, "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed = json_body(listing).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn patch_by_a_different_caller_is_not_found() {
    let app = happy_app();
    let upload = app
        .clone()
        .oneshot(multipart_upload("cat.jpg", Some("tok")))
        .await
        .unwrap();
    let uploaded = json_body(upload).await;
    let id = uploaded["data"]["id"].as_str().unwrap().to_string();

    let patch = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/images/{id}"))
                .header(header::AUTHORIZATION, "Bearer other-user")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"deleted":true}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(patch.status(), StatusCode::NOT_FOUND);
}
