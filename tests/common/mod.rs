#![allow(dead_code)]

use async_trait::async_trait;
use pagcompleto_processor::error::GatewayError;
use pagcompleto_processor::models::{FormattedChargeRequest, GatewayResponse, Order};
use pagcompleto_processor::services::ChargeGateway;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

pub const TOKEN: &str = "test-token";

/// A pending credit-card order that passes validation.
pub fn order(id: i64) -> Order {
    Order {
        id,
        total_amount: 100.0 + id as f64,
        freight_amount: 15.0,
        created_at: None,
        customer_id: 500 + id,
        store_id: 1,
        payment_id: 900 + id,
        payment_method_id: 3,
        payment_method: Some("Cartão de Crédito".to_string()),
        installments: Some(1),
        card_number: Some("4111-1111-1111-1111".to_string()),
        card_holder_name: Some("Cliente Teste".to_string()),
        card_cvv: Some("123".to_string()),
        card_expiry: Some("05/2030".to_string()),
        customer_name: Some("Cliente Teste".to_string()),
        customer_document: Some("12345678901".to_string()),
        customer_email: Some("teste@exemplo.com".to_string()),
        person_type: Some("F".to_string()),
        endpoint: Some("https://pagcompleto.test".to_string()),
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Unreachable,
    Malformed,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: String,
    pub access_token: String,
    pub request: FormattedChargeRequest,
}

/// Gateway double answering each order id with a scripted reply.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<HashMap<i64, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, order_id: i64, reply: Reply) -> Self {
        self.replies.lock().insert(order_id, reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChargeGateway for ScriptedGateway {
    async fn charge(
        &self,
        endpoint: &str,
        access_token: &str,
        request: &FormattedChargeRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        self.calls.lock().push(Call {
            endpoint: endpoint.to_string(),
            access_token: access_token.to_string(),
            request: request.clone(),
        });

        let reply = self.replies.lock().get(&request.external_order_id).cloned();
        match reply {
            Some(Reply::Json(value)) => GatewayResponse::from_value(value),
            Some(Reply::Malformed) => Err(GatewayError::Protocol("not json".to_string())),
            Some(Reply::Unreachable) | None => {
                Err(GatewayError::Transport("connection refused".to_string()))
            }
        }
    }
}
