//! HTTP client for the leafcheck server

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{CliError, Result};

/// `/predict` answer. The three lists are absent when the server runs
/// without metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub class: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precaution: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cure: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classes {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Languages {
    pub default: String,
    pub available: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
    pub backend: String,
    pub target: String,
    pub classes: usize,
    pub metadata_enabled: bool,
    pub languages: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CliError::InvalidResponse(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn ping(&self) -> Result<String> {
        self.get_json("/ping").await
    }

    pub async fn classes(&self) -> Result<Classes> {
        self.get_json("/classes").await
    }

    pub async fn languages(&self) -> Result<Languages> {
        self.get_json("/languages").await
    }

    pub async fn health(&self) -> Result<Health> {
        self.get_json("/health").await
    }

    /// Upload one image as multipart field `file`.
    pub async fn predict(
        &self,
        image: Vec<u8>,
        file_name: String,
        lang: Option<&str>,
    ) -> Result<Prediction> {
        let url = self.url("/predict");
        debug!("POST {} ({} bytes, lang={:?})", url, image.len(), lang);

        let form = Form::new().part("file", Part::bytes(image).file_name(file_name));
        let mut request = self.client.post(&url).multipart(form);
        if let Some(lang) = lang {
            request = request.query(&[("lang", lang)]);
        }

        let response = request
            .send()
            .await
            .map_err(|source| CliError::Connection { url, source })?;
        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| CliError::Connection { url, source })?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CliError::InvalidResponse(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        return Err(CliError::Server {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| CliError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn ping_reads_plain_json_string() {
        let base = spawn_server(Router::new().route("/ping", get(|| async { Json("Hello, I am alive") }))).await;
        assert_eq!(client(&base).ping().await.unwrap(), "Hello, I am alive");
    }

    #[tokio::test]
    async fn predict_uploads_file_field_and_language() {
        let app = Router::new().route(
            "/predict",
            post(
                |Query(query): Query<HashMap<String, String>>, mut multipart: Multipart| async move {
                    let field = multipart.next_field().await.unwrap().unwrap();
                    let name = field.name().unwrap().to_string();
                    let bytes = field.bytes().await.unwrap();
                    Json(json!({
                        "class": format!("{}:{}:{}", name, bytes.len(), query["lang"]),
                        "confidence": 0.5,
                        "cause": [],
                        "precaution": [],
                        "cure": []
                    }))
                },
            ),
        );
        let base = spawn_server(app).await;

        let prediction = client(&base)
            .predict(vec![7; 42], "leaf.jpg".to_string(), Some("fr"))
            .await
            .unwrap();
        assert_eq!(prediction.class, "file:42:fr");
        assert_eq!(prediction.cause, Some(vec![]));
    }

    #[tokio::test]
    async fn prediction_without_metadata_has_no_lists() {
        let app = Router::new().route(
            "/predict",
            post(|| async { Json(json!({"class": "Potato___healthy", "confidence": 0.9})) }),
        );
        let base = spawn_server(app).await;

        let prediction = client(&base)
            .predict(vec![1], "leaf.png".to_string(), None)
            .await
            .unwrap();
        assert_eq!(prediction.cause, None);
        assert_eq!(prediction.cure, None);
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let app = Router::new().route(
            "/predict",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": {"message": "Invalid image: unsupported format", "type": "invalid_request_error", "code": "400"}})),
                )
            }),
        );
        let base = spawn_server(app).await;

        let err = client(&base)
            .predict(b"text".to_vec(), "notes.txt".to_string(), None)
            .await
            .unwrap_err();
        match err {
            CliError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid image: unsupported format");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unexpected_body_is_invalid_response() {
        let app = Router::new().route("/classes", get(|| async { Json(Value::from(42)) }));
        let base = spawn_server(app).await;

        let err = client(&base).classes().await.unwrap_err();
        assert!(matches!(err, CliError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr)).ping().await.unwrap_err();
        assert!(matches!(err, CliError::Connection { .. }));
    }
}
