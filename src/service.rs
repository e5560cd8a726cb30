//! HTTP front end over the conversion pipeline.

use crate::configs::ConvertConfig;
use crate::error::Error;
use crate::pipeline::{prepare, LabelOverrides};
use crate::runtime::trace::TracingTrace;
use crate::types::StructureStrategy;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: ConvertConfig,
}

impl AppState {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/prepare", post(handle_prepare))
        .route("/convert", post(handle_convert))
        .fallback(handle_health)
        .with_state(state)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareResponse {
    pub author: String,
    pub title: String,
    /// Dotted level names.
    pub structure: String,
    pub strategy: StructureStrategy,
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    pub document: String,
    #[serde(flatten)]
    pub overrides: LabelOverrides,
}

#[derive(Debug)]
pub enum ServiceError {
    Conversion(Error),
    Timeout(u64),
    Internal(String),
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        ServiceError::Conversion(err)
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Conversion(err) if err.is_document_shape() => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Conversion(err) if err.is_malformed() => StatusCode::BAD_REQUEST,
            ServiceError::Conversion(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn message(&self) -> String {
        match self {
            ServiceError::Conversion(err) => err.to_string(),
            ServiceError::Timeout(secs) => format!("Conversion did not finish within {secs}s"),
            ServiceError::Internal(message) => message.clone(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!("[Service] {}", message);
        } else {
            tracing::warn!("[Service] Rejected document: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Runs one conversion job on the blocking pool under the configured timeout.
async fn run_blocking<T, F>(timeout_secs: u64, job: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);
    match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Err(_) => Err(ServiceError::Timeout(timeout_secs)),
        Ok(Err(join)) => Err(ServiceError::Internal(format!(
            "Conversion task panicked or was cancelled: {join}"
        ))),
        Ok(Ok(result)) => result.map_err(ServiceError::from),
    }
}

pub async fn handle_prepare(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<PrepareResponse>, ServiceError> {
    let timeout = state.config.request_timeout_secs;
    let response = run_blocking(timeout, move || {
        let config = &state.config;
        let prepared = prepare(&body, config, &TracingTrace)?;
        Ok(PrepareResponse {
            author: prepared.labels().author.clone(),
            title: prepared.labels().title.clone(),
            structure: prepared.structure().structure().to_string(),
            strategy: prepared.structure().strategy(),
            filename: prepared.suggested_filename(config),
        })
    })
    .await?;

    Ok(Json(response))
}

pub async fn handle_convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Response, ServiceError> {
    let timeout = state.config.request_timeout_secs;
    let conversion = run_blocking(timeout, move || {
        let config = &state.config;
        prepare(&request.document, config, &TracingTrace)?.convert(
            &request.overrides,
            config,
            &TracingTrace,
        )
    })
    .await?;

    tracing::info!(
        "[Service] Converted {} ({} units)",
        conversion.filename,
        conversion.unit_count
    );

    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(&conversion.filename)
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        conversion.tess,
    )
        .into_response())
}

pub async fn handle_health() -> &'static str {
    "ok"
}
