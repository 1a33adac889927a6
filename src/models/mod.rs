pub mod charge;
pub mod order;
pub mod report;

pub use charge::{ChargeCustomer, ChargeDocument, FormattedChargeRequest, GatewayResponse, TransactionOutcome};
pub use order::{Customer, Order, OrderStatus, PaymentType, PersonType};
pub use report::{OrderOutcome, ProcessingReport};
