//! Charges pending credit-card orders through the PAGCOMPLETO gateway and
//! writes the outcome back to the store database.
//!
//! The pipeline is [`services::PaymentProcessor`]: it fetches pending orders
//! from a [`store::PaymentStore`], builds and validates a gateway request for
//! each one, charges it through a [`services::ChargeGateway`] and records the
//! new order status.

pub mod app;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
