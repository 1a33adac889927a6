use crate::error::FormatError;
use crate::models::{ChargeCustomer, ChargeDocument, FormattedChargeRequest, Order};
use crate::services::payment_validator;
use crate::store::PaymentStore;
use crate::utils::card::{digits_only, normalize_expiry};
use std::sync::Arc;
use tracing::debug;

/// Builds gateway charge requests from stored orders.
pub struct OrderFormatter {
    store: Arc<dyn PaymentStore>,
}

impl OrderFormatter {
    pub fn new(store: Arc<dyn PaymentStore>) -> Self {
        Self { store }
    }

    /// Maps the order to the gateway schema and validates the result.
    /// A request is only returned when it passed validation.
    pub async fn format(&self, order: &Order) -> Result<FormattedChargeRequest, FormatError> {
        let mut customer = order.customer();
        customer.birthdate = self.store.fetch_customer_birthdate(customer.id).await?;
        if customer.birthdate.is_none() {
            debug!("No birthdate on file for customer {}", customer.id);
        }

        let birthday = customer
            .birthdate
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let request = FormattedChargeRequest {
            external_order_id: order.id,
            amount: order.total_amount,
            card_number: order.card_number.as_deref().map(digits_only).unwrap_or_default(),
            card_cvv: order.card_cvv.clone().unwrap_or_default(),
            card_expiration_date: order.card_expiry.as_deref().map(normalize_expiry).unwrap_or_default(),
            card_holder_name: order.card_holder_name.clone().unwrap_or_default(),
            customer: Some(ChargeCustomer {
                external_id: customer.id.to_string(),
                name: customer.name,
                kind: customer.person_type.as_str().to_string(),
                email: customer.email,
                documents: vec![ChargeDocument::cpf(customer.document)],
                birthday,
            }),
        };

        payment_validator::validate(&request)?;
        Ok(request)
    }
}
