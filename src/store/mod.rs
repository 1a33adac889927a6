//! Data store access for orders and their payment records.
//!
//! [`PaymentStore`] is the seam the processor and formatter depend on. The
//! production implementation is [`PgStore`]; [`InMemoryStore`] serves tests
//! and local demos.

pub mod in_memory;
pub mod postgres;

use crate::error::StoreError;
use crate::models::{Order, OrderStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

/// Positional statement parameter (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(v.into())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Orders awaiting payment on the PAGCOMPLETO gateway by credit card.
    async fn fetch_pending_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// `Ok(None)` when the customer row or its birthdate is missing.
    async fn fetch_customer_birthdate(&self, customer_id: i64) -> Result<Option<NaiveDate>, StoreError>;

    /// Writes the new order status together with the raw gateway answer and
    /// the processing timestamp.
    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        gateway_response: &Value,
    ) -> Result<(), StoreError>;
}
