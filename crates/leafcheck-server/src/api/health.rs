//! Liveness and introspection endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Fixed liveness answer
pub async fn ping() -> Json<&'static str> {
    Json("Hello, I am alive")
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: String,
    pub target: String,
    pub classes: usize,
    pub metadata_enabled: bool,
    pub languages: Vec<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let service = &state.service;
    Json(HealthResponse {
        status: "ok",
        backend: service.backend_kind().to_string(),
        target: service.backend_target(),
        classes: service.labels().len(),
        metadata_enabled: service.metadata().is_enabled(),
        languages: service.metadata().languages(),
    })
}

#[derive(Debug, Serialize)]
pub struct ClassesResponse {
    pub classes: Vec<String>,
}

pub async fn classes(State(state): State<AppState>) -> Json<ClassesResponse> {
    Json(ClassesResponse {
        classes: state.service.labels().to_vec(),
    })
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub default: String,
    pub available: Vec<String>,
}

pub async fn languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let metadata = state.service.metadata();
    Json(LanguagesResponse {
        default: metadata.default_language().to_string(),
        available: metadata.languages(),
    })
}
