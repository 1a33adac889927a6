use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Payload enviado ao endpoint processTransaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedChargeRequest {
    pub external_order_id: i64,
    pub amount: f64,
    pub card_number: String,
    pub card_cvv: String,
    /// MMYY
    pub card_expiration_date: String,
    pub card_holder_name: String,
    pub customer: Option<ChargeCustomer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeCustomer {
    pub external_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
    pub documents: Vec<ChargeDocument>,
    pub birthday: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

impl ChargeDocument {
    pub fn cpf(number: impl Into<String>) -> Self {
        Self {
            kind: "cpf".to_string(),
            number: number.into(),
        }
    }
}

/// Decoded answer of the gateway. The whole object is kept in `raw` so it
/// can be stored for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub transaction_code: Option<String>,
    pub message: Option<String>,
    pub raw: Value,
}

impl GatewayResponse {
    pub fn from_value(value: Value) -> Result<Self, GatewayError> {
        let Value::Object(fields) = value else {
            return Err(GatewayError::Protocol(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        };

        Ok(Self {
            transaction_code: scalar_field(&fields, "Transaction_code"),
            message: scalar_field(&fields, "Message"),
            raw: Value::Object(fields),
        })
    }

    pub fn outcome(&self) -> TransactionOutcome {
        match self.transaction_code.as_deref() {
            None => TransactionOutcome::Incomplete,
            Some("00") => TransactionOutcome::Approved,
            Some("03") | Some("04") => TransactionOutcome::Declined,
            Some(_) => TransactionOutcome::Indeterminate,
        }
    }
}

/// How the processor reads a gateway transaction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    Approved,
    Declined,
    Indeterminate,
    Incomplete,
}

fn scalar_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_codes() {
        let approved = GatewayResponse::from_value(json!({"Transaction_code": "00"})).unwrap();
        assert_eq!(approved.outcome(), TransactionOutcome::Approved);

        let declined = GatewayResponse::from_value(json!({
            "Transaction_code": "04",
            "Message": "insufficient funds"
        }))
        .unwrap();
        assert_eq!(declined.outcome(), TransactionOutcome::Declined);
        assert_eq!(declined.message.as_deref(), Some("insufficient funds"));

        let other = GatewayResponse::from_value(json!({"Transaction_code": "51"})).unwrap();
        assert_eq!(other.outcome(), TransactionOutcome::Indeterminate);

        let empty = GatewayResponse::from_value(json!({})).unwrap();
        assert_eq!(empty.outcome(), TransactionOutcome::Incomplete);
        assert_eq!(empty.raw, json!({}));
    }

    #[test]
    fn test_numeric_code_is_stringified() {
        let response = GatewayResponse::from_value(json!({"Transaction_code": 5})).unwrap();
        assert_eq!(response.transaction_code.as_deref(), Some("5"));
    }

    #[test]
    fn test_non_object_is_protocol_error() {
        assert!(matches!(
            GatewayResponse::from_value(Value::Null),
            Err(GatewayError::Protocol(_))
        ));
        assert!(matches!(
            GatewayResponse::from_value(json!(["00"])),
            Err(GatewayError::Protocol(_))
        ));
    }

    #[test]
    fn test_request_wire_format() {
        let request = FormattedChargeRequest {
            external_order_id: 98,
            amount: 150.5,
            card_number: "4111111111111111".to_string(),
            card_cvv: "123".to_string(),
            card_expiration_date: "0525".to_string(),
            card_holder_name: "Maria Silva".to_string(),
            customer: Some(ChargeCustomer {
                external_id: "7".to_string(),
                name: "Maria Silva".to_string(),
                kind: "individual".to_string(),
                email: "maria@exemplo.com".to_string(),
                documents: vec![ChargeDocument::cpf("12345678901")],
                birthday: "1990-04-12".to_string(),
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["customer"]["type"], "individual");
        assert_eq!(value["customer"]["documents"][0]["type"], "cpf");
        assert_eq!(value["card_expiration_date"], "0525");
    }
}
