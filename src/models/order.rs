use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An order awaiting a credit-card charge, joined with its payment record,
/// customer and the gateway endpoint configured for its store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub total_amount: f64,
    pub freight_amount: f64,
    pub created_at: Option<NaiveDateTime>,
    pub customer_id: i64,
    pub store_id: i64,
    pub payment_id: i64,
    pub payment_method_id: i64,
    pub payment_method: Option<String>,
    pub installments: Option<i32>,
    pub card_number: Option<String>,
    pub card_holder_name: Option<String>,
    pub card_cvv: Option<String>,
    pub card_expiry: Option<String>,
    pub customer_name: Option<String>,
    pub customer_document: Option<String>,
    pub customer_email: Option<String>,
    pub person_type: Option<String>,
    pub endpoint: Option<String>,
}

impl Order {
    pub fn customer(&self) -> Customer {
        Customer {
            id: self.customer_id,
            name: self.customer_name.clone().unwrap_or_default(),
            document: self.customer_document.clone().unwrap_or_default(),
            email: self.customer_email.clone().unwrap_or_default(),
            person_type: PersonType::from_flag(self.person_type.as_deref().unwrap_or_default()),
            birthdate: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub document: String,
    pub email: String,
    pub person_type: PersonType,
    /// Loaded separately from the order query.
    pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonType {
    Individual,
    Corporation,
}

impl PersonType {
    /// `F` (pessoa física) is an individual; every other flag is a company.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "F" {
            PersonType::Individual
        } else {
            PersonType::Corporation
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Individual => "individual",
            PersonType::Corporation => "corporation",
        }
    }
}

/// Values of `pedidos.id_situacao` touched by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    AwaitingPayment = 1,
    Paid = 2,
    PaymentDeclined = 3,
}

impl OrderStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Gateway payment type for a `formas_pagamento` id.
///
/// Only credit-card orders are selected today, so request building does not
/// consult this mapping; it is kept for when boleto and pix are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Boleto,
    Pix,
    CreditCard,
    Unknown,
}

impl PaymentType {
    pub fn from_method_id(id: i64) -> Self {
        match id {
            1 => PaymentType::Boleto,
            2 => PaymentType::Pix,
            3 => PaymentType::CreditCard,
            _ => PaymentType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Boleto => "boleto",
            PaymentType::Pix => "pix",
            PaymentType::CreditCard => "credit_card",
            PaymentType::Unknown => "unknown",
        }
    }
}
