//! Application state shared by every handler

use leafcheck_core::PredictionService;
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; shared without locking
    pub service: Arc<PredictionService>,
    /// Bounds the number of predictions in flight
    pub request_semaphore: Arc<Semaphore>,
    pub body_limit_bytes: usize,
}

impl AppState {
    pub fn new(service: PredictionService, max_concurrent: usize, body_limit_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            request_semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            body_limit_bytes,
        }
    }

    /// Acquire a permit for one prediction.
    pub async fn acquire_permit(&self) -> Result<SemaphorePermit<'_>, ApiError> {
        self.request_semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::internal("request limiter is closed"))
    }
}
