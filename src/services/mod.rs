pub mod gateway_client;
pub mod order_formatter;
pub mod payment_processor;
pub mod payment_validator;

pub use gateway_client::{ChargeGateway, PagcompletoClient};
pub use order_formatter::OrderFormatter;
pub use payment_processor::PaymentProcessor;
