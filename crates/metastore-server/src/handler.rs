use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use metastore_codec::{Format, MetadataCodec};
use metastore_store::{Entry, MetadataStore, SharedStore};

use crate::endpoint::HealthResponse;
use crate::error::{ApiError, ApiResult};

/// State shared by every handler: a handle to the one store.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: SharedStore,
}

/// `?format=` selector for snapshot endpoints. Defaults to JSON.
#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

impl FormatQuery {
    fn resolve(&self) -> ApiResult<Format> {
        match &self.format {
            Some(name) => name.parse().map_err(ApiError::from),
            None => Ok(Format::Json),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "metastore-server",
        "version": env!("CARGO_PKG_VERSION"),
        "identifiers": state.store.len(),
    }))
}

pub async fn list_identifiers(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.list_identifiers())
}

pub async fn create_identifier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.create_entry(&id)?;
    Ok(StatusCode::CREATED)
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Entry>> {
    Ok(Json(state.store.get_entry(&id)?))
}

pub async fn delete_identifier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.delete_entry(&id);
    StatusCode::NO_CONTENT
}

pub async fn get_value(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> ApiResult<String> {
    Ok(state.store.get_value(&id, &key)?)
}

/// `PUT`: insert or overwrite.
pub async fn upsert_value(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
    value: String,
) -> StatusCode {
    state.store.upsert(&id, &key, &value);
    StatusCode::NO_CONTENT
}

/// `POST`: first write only, 409 if the key is already set.
pub async fn insert_value(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
    value: String,
) -> ApiResult<StatusCode> {
    state.store.set_key_strict(&id, &key, &value)?;
    Ok(StatusCode::CREATED)
}

pub async fn delete_key(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> StatusCode {
    state.store.delete_key(&id, &key);
    StatusCode::NO_CONTENT
}

pub async fn export_snapshot(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> ApiResult<Response> {
    let format = query.resolve()?;
    let body = MetadataCodec::encode_store(&*state.store, format)?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Replace the whole store with the uploaded document.
pub async fn import_snapshot(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let format = query.resolve()?;
    MetadataCodec::decode_into(&*state.store, &body, format)?;
    tracing::info!(%format, identifiers = state.store.len(), "imported snapshot");
    Ok(StatusCode::NO_CONTENT)
}
