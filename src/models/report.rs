use serde::{Deserialize, Serialize};

pub const NO_PENDING_ORDERS: &str = "Nenhum pedido pendente encontrado.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub order_id: i64,
    pub message: String,
}

/// Result of one batch run, returned to the caller and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub success: Vec<OrderOutcome>,
    pub failures: Vec<OrderOutcome>,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProcessingReport {
    pub fn nothing_pending() -> Self {
        Self {
            message: Some(NO_PENDING_ORDERS.to_string()),
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, order_id: i64, message: impl Into<String>) {
        self.success.push(OrderOutcome {
            order_id,
            message: message.into(),
        });
    }

    pub fn record_failure(&mut self, order_id: i64, message: impl Into<String>) {
        self.failures.push(OrderOutcome {
            order_id,
            message: message.into(),
        });
    }

    /// Fills the totals once every fetched order has an outcome.
    pub fn finish(&mut self, processed: usize) {
        self.processed = processed;
        self.successful = self.success.len();
        self.failed = self.failures.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_pending_shape() {
        let value = serde_json::to_value(ProcessingReport::nothing_pending()).unwrap();
        assert_eq!(value["processed"], 0);
        assert_eq!(value["message"], NO_PENDING_ORDERS);
    }

    #[test]
    fn test_finish_counts() {
        let mut report = ProcessingReport::default();
        report.record_success(1, "Pagamento aprovado");
        report.record_failure(2, "CVV inválido");
        report.record_failure(3, "CVV inválido");
        report.finish(3);

        assert_eq!(report.processed, 3);
        assert_eq!(report.successful, 1);
        assert_eq!(report.failed, 2);
        assert!(serde_json::to_value(&report).unwrap().get("message").is_none());
    }
}
