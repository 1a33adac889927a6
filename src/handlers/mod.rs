pub mod process_payments;

use crate::services::PaymentProcessor;
use axum::{
    http::StatusCode,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub processor: PaymentProcessor,
    pub pretty_report: bool,
    run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(processor: PaymentProcessor, pretty_report: bool) -> Self {
        Self {
            processor,
            pretty_report,
            run_lock: Mutex::new(()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", any(process_payments::process_payments))
        .route("/process-payments", any(process_payments::process_payments))
        .with_state(state)
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
