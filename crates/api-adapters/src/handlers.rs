//! Request handlers: upload, list, update, search.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use domains::{AppError, ImageFilter, ImagePatch, ImageRecord};
use services::search;

use crate::error::ApiError;
use crate::AppState;

/// Pulls the bearer token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))
}

/// `POST /images`: multipart upload with an `image` field. Runs the full
/// ingestion pipeline before responding; a successful response means the
/// record is persisted, whether or not enrichment landed.
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let bearer = bearer_token(&headers)?.to_string();
    let owner = state.identity.resolve(&bearer).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("image field has no filename".into()))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read image field: {e}")))?;
        upload = Some((filename, content_type, data));
        break;
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| AppError::Validation("no image file provided".into()))?;
    let content_type = content_type
        .or_else(|| {
            mime_guess::from_path(&filename)
                .first_raw()
                .map(str::to_string)
        })
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
    debug!(%filename, %content_type, size = data.len(), "upload received");

    let record = state
        .pipeline
        .ingest(owner, &bearer, &filename, &content_type, data)
        .await?;

    Ok(Json(json!({
        "message": "Upload successful",
        "url": record.url,
        "data": record,
    })))
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub favorites: bool,
}

/// `GET /images`: the caller's visible images, most-recent-first.
pub async fn list_images(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let owner = state.identity.resolve(bearer_token(&headers)?).await?;
    let images = state
        .meta
        .list(
            owner,
            ImageFilter {
                favorites_only: params.favorites,
            },
        )
        .await?;
    Ok(Json(images))
}

/// `PATCH /images/{id}`: rename and flag toggles. Plain field updates; the
/// stored object itself is never touched.
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(patch): Json<ImagePatch>,
) -> Result<Json<ImageRecord>, ApiError> {
    let owner = state.identity.resolve(bearer_token(&headers)?).await?;
    let updated = state.meta.update(owner, id, patch).await?;
    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// `GET /search?query=...`: boolean match over filename and tags. A blank
/// query is "no filter" and returns the full visible listing.
pub async fn search_images(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let owner = state.identity.resolve(bearer_token(&headers)?).await?;
    let query = params
        .query
        .ok_or_else(|| AppError::Validation("query parameter is required".into()))?;

    let candidates = state.meta.list(owner, ImageFilter::default()).await?;
    let tokens = search::tokenize(&query);
    let results = if tokens.is_empty() {
        search::SearchResults {
            count: candidates.len(),
            images: candidates,
        }
    } else {
        search::filter(candidates, &tokens)
    };
    Ok(Json(json!({
        "images": results.images,
        "count": results.count,
    })))
}
