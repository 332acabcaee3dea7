//! Image listing, upload and delete handlers

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use resimg_core::models::{AssetRecord, CropOffset, DeleteOutcome, SizeLabel};
use resimg_core::validation::parse_resource_id;
use resimg_core::StoreError;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const CROP_FIELD: &str = "crop";

/// Listing entry: an asset record plus its public URL.
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    #[serde(flatten)]
    pub record: AssetRecord,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub written: bool,
    pub filename: String,
    pub sizes: Vec<SizeLabel>,
}

fn with_urls(state: &AppState, records: Vec<AssetRecord>) -> Vec<AssetResponse> {
    records
        .into_iter()
        .map(|record| AssetResponse {
            url: state.public_url(&record.path),
            record,
        })
        .collect()
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.store.list_assets().await?;
    Ok(Json(with_urls(&state, records)))
}

pub async fn list_resource_images(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_resource_id(&id)?;
    let records = state.store.list_assets_for(&resource, id).await?;
    Ok(Json(with_urls(&state, records)))
}

/// Multipart upload: one `file` part and any number of `crop` parts.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_resource_id(&id)?;

    let mut file: Option<(String, Bytes)> = None;
    let mut crops = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let data = field.bytes().await?;
                file = Some((filename, data));
            }
            Some(CROP_FIELD) => {
                let text = field.text().await?;
                let offset = CropOffset::from_str(&text).map_err(StoreError::InvalidCrop)?;
                crops.push(offset);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    let (filename, data) = match file {
        Some((filename, data)) => (filename, Some(data)),
        None => (String::new(), None),
    };

    let outcome = state
        .store
        .upload_image(&resource, id, &filename, data, &crops)
        .await?;

    Ok(Json(UploadResponse {
        written: outcome.written,
        filename: outcome.filename,
        sizes: outcome.sizes,
    }))
}

pub async fn delete_resource_images(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<DeleteOutcome>, HttpAppError> {
    let id = parse_resource_id(&id)?;
    let outcome = state.store.delete_asset_group(&resource, id).await?;
    Ok(Json(outcome))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path((resource, id, filename)): Path<(String, String, String)>,
) -> Result<Json<DeleteOutcome>, HttpAppError> {
    let id = parse_resource_id(&id)?;
    let outcome = state
        .store
        .delete_asset_by_filename(&resource, id, &filename)
        .await?;
    Ok(Json(outcome))
}
