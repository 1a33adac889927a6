use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::handlers::AppState;
use crate::models::ProcessingReport;

const METHOD_NOT_ALLOWED: &str = "Método não permitido. Utilize POST para processar pagamentos.";

/// Error bodies returned by the trigger endpoint.
#[derive(Debug)]
pub enum ApiError {
    MethodNotAllowed,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED.to_string()),
            ApiError::Internal(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro interno: {}", detail),
            ),
        };

        (status, Json(json!({ "error": true, "message": message }))).into_response()
    }
}

pub async fn process_payments(
    State(state): State<Arc<AppState>>,
    method: Method,
) -> Result<Response, ApiError> {
    if method != Method::POST {
        warn!("Rejected {} on the payment trigger", method);
        return Err(ApiError::MethodNotAllowed);
    }

    // one batch at a time so an order is never charged twice
    let _running = state.run_lock.lock().await;
    info!("Received payment batch trigger");

    let report = state.processor.process_pending_payments().await.map_err(|e| {
        error!("Payment batch aborted: {:?}", e);
        ApiError::Internal(e.to_string())
    })?;

    render_report(&report, state.pretty_report)
}

fn render_report(report: &ProcessingReport, pretty: bool) -> Result<Response, ApiError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    let body = rendered.map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
