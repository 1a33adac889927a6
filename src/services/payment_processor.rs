use crate::error::{BatchError, FormatError};
use crate::models::{GatewayResponse, Order, OrderStatus, ProcessingReport, TransactionOutcome};
use crate::services::gateway_client::ChargeGateway;
use crate::services::order_formatter::OrderFormatter;
use crate::store::PaymentStore;
use std::sync::Arc;
use tracing::{error, info, warn};

const UNKNOWN_REASON: &str = "Motivo desconhecido";
const CUSTOMER_LOOKUP_FAILED: &str = "Erro: falha ao consultar dados do cliente";

/// Runs a batch: every pending order is formatted, charged and written back,
/// one at a time.
pub struct PaymentProcessor {
    store: Arc<dyn PaymentStore>,
    gateway: Arc<dyn ChargeGateway>,
    formatter: OrderFormatter,
    access_token: String,
}

/// Where a single order ended up.
enum Resolution {
    Success(String),
    Failure(String),
}

impl PaymentProcessor {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        gateway: Arc<dyn ChargeGateway>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            formatter: OrderFormatter::new(store.clone()),
            store,
            gateway,
            access_token: access_token.into(),
        }
    }

    pub async fn process_pending_payments(&self) -> Result<ProcessingReport, BatchError> {
        let orders = self
            .store
            .fetch_pending_orders()
            .await
            .map_err(BatchError::FetchPendingOrders)?;

        if orders.is_empty() {
            info!("No pending orders to process");
            return Ok(ProcessingReport::nothing_pending());
        }

        info!("Processing {} pending orders", orders.len());
        let mut report = ProcessingReport::default();

        for order in &orders {
            match self.process_order(order).await {
                Resolution::Success(message) => report.record_success(order.id, message),
                Resolution::Failure(message) => report.record_failure(order.id, message),
            }
        }

        report.finish(orders.len());
        info!(
            "Batch finished: {} processed, {} approved, {} failed",
            report.processed, report.successful, report.failed
        );
        Ok(report)
    }

    async fn process_order(&self, order: &Order) -> Resolution {
        let request = match self.formatter.format(order).await {
            Ok(request) => request,
            Err(FormatError::Validation(e)) => {
                warn!("Order {} failed validation: {}", order.id, e);
                return Resolution::Failure(format!("Erro de validação: {}", e));
            }
            Err(FormatError::Store(e)) => {
                error!("Order {} could not be formatted: {}", order.id, e);
                return Resolution::Failure(CUSTOMER_LOOKUP_FAILED.to_string());
            }
        };

        let endpoint = order.endpoint.as_deref().unwrap_or_default();
        let response = match self.gateway.charge(endpoint, &self.access_token, &request).await {
            Ok(response) => response,
            Err(e) => {
                // status stays untouched; the order is picked up again next run
                error!("No usable gateway response for order {}: {}", order.id, e);
                return Resolution::Failure(format!(
                    "Resposta inválida da API para o pedido {}",
                    order.id
                ));
            }
        };

        let (status, resolution) = resolve(&response);
        self.persist(order.id, status, &response).await;
        resolution
    }

    async fn persist(&self, order_id: i64, status: OrderStatus, response: &GatewayResponse) {
        if let Err(e) = self
            .store
            .update_order_status(order_id, status, &response.raw)
            .await
        {
            error!(
                "Failed to store status {:?} for order {}: {}",
                status, order_id, e
            );
        }
    }
}

fn resolve(response: &GatewayResponse) -> (OrderStatus, Resolution) {
    let reason = || response.message.as_deref().unwrap_or(UNKNOWN_REASON);

    match response.outcome() {
        TransactionOutcome::Approved => (
            OrderStatus::Paid,
            Resolution::Success("Pagamento aprovado".to_string()),
        ),
        TransactionOutcome::Declined => (
            OrderStatus::PaymentDeclined,
            Resolution::Failure(format!("Pagamento recusado: {}", reason())),
        ),
        TransactionOutcome::Indeterminate => (
            OrderStatus::AwaitingPayment,
            Resolution::Failure(format!("Status indefinido: {}", reason())),
        ),
        TransactionOutcome::Incomplete => (
            OrderStatus::AwaitingPayment,
            Resolution::Failure("Erro: Resposta incompleta da API".to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(resolution: Resolution) -> String {
        match resolution {
            Resolution::Success(m) | Resolution::Failure(m) => m,
        }
    }

    #[test]
    fn test_resolve_approved() {
        let response = GatewayResponse::from_value(json!({"Transaction_code": "00"})).unwrap();
        let (status, resolution) = resolve(&response);
        assert_eq!(status, OrderStatus::Paid);
        assert!(matches!(resolution, Resolution::Success(_)));
    }

    #[test]
    fn test_resolve_declined_without_message() {
        let response = GatewayResponse::from_value(json!({"Transaction_code": "03"})).unwrap();
        let (status, resolution) = resolve(&response);
        assert_eq!(status, OrderStatus::PaymentDeclined);
        assert_eq!(message(resolution), "Pagamento recusado: Motivo desconhecido");
    }

    #[test]
    fn test_resolve_indeterminate() {
        let response = GatewayResponse::from_value(json!({
            "Transaction_code": "99",
            "Message": "em análise"
        }))
        .unwrap();
        let (status, resolution) = resolve(&response);
        assert_eq!(status, OrderStatus::AwaitingPayment);
        assert_eq!(message(resolution), "Status indefinido: em análise");
    }
}
