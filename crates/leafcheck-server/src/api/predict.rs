//! Image upload -> disease prediction

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use leafcheck_core::PredictionResult;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

/// Classify the image in multipart field `file`.
pub async fn predict(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
    multipart: Multipart,
) -> Result<Json<PredictionResult>, ApiError> {
    let image = read_file_field(multipart).await?;
    let language = query
        .lang
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| state.service.metadata().default_language())
        .to_string();
    info!("Predict request: {} bytes, lang={}", image.len(), language);

    let _permit = state.acquire_permit().await?;
    let result = state.service.predict(image, &language).await?;

    Ok(Json(result))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(ApiError::from)?
    {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(ApiError::from)?;
            return Ok(bytes.to_vec());
        }
    }

    Err(ApiError::bad_request(
        "Missing image in multipart request (expected 'file' field)",
    ))
}
