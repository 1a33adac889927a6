use super::PaymentStore;
use crate::error::StoreError;
use crate::models::{Order, OrderStatus, PaymentType};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// A status write as it would land in `pedidos` / `pedidos_pagamentos`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub order_id: i64,
    pub status: OrderStatus,
    pub gateway_response: Value,
    pub processed_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    statuses: HashMap<i64, OrderStatus>,
    birthdates: HashMap<i64, NaiveDate>,
    updates: Vec<StatusUpdate>,
    fail_fetch: bool,
    fail_birthdate: HashSet<i64>,
    fail_update: HashSet<i64>,
}

/// Store kept entirely in memory. Every seeded order starts awaiting payment.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: Vec<Order>) -> Self {
        let store = Self::new();
        for order in orders {
            store.insert_order(order);
        }
        store
    }

    pub fn insert_order(&self, order: Order) {
        let mut state = self.state.lock();
        state.statuses.insert(order.id, OrderStatus::AwaitingPayment);
        state.orders.push(order);
    }

    pub fn set_birthdate(&self, customer_id: i64, birthdate: NaiveDate) {
        self.state.lock().birthdates.insert(customer_id, birthdate);
    }

    /// Makes the next pending-orders fetch fail as if the database were down.
    pub fn fail_fetch(&self) {
        self.state.lock().fail_fetch = true;
    }

    pub fn fail_birthdate_lookup(&self, customer_id: i64) {
        self.state.lock().fail_birthdate.insert(customer_id);
    }

    pub fn fail_update_for(&self, order_id: i64) {
        self.state.lock().fail_update.insert(order_id);
    }

    pub fn status_of(&self, order_id: i64) -> Option<OrderStatus> {
        self.state.lock().statuses.get(&order_id).copied()
    }

    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.state.lock().updates.clone()
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore {
    async fn fetch_pending_orders(&self) -> Result<Vec<Order>, StoreError> {
        let state = self.state.lock();
        if state.fail_fetch {
            return Err(StoreError::Connection("in-memory store offline".to_string()));
        }

        let mut pending: Vec<Order> = state
            .orders
            .iter()
            .filter(|order| {
                PaymentType::from_method_id(order.payment_method_id) == PaymentType::CreditCard
                    && state.statuses.get(&order.id) == Some(&OrderStatus::AwaitingPayment)
            })
            .cloned()
            .collect();
        pending.sort_by_key(|order| order.id);
        Ok(pending)
    }

    async fn fetch_customer_birthdate(&self, customer_id: i64) -> Result<Option<NaiveDate>, StoreError> {
        let state = self.state.lock();
        if state.fail_birthdate.contains(&customer_id) {
            return Err(StoreError::Statement(format!(
                "birthdate lookup failed for customer {}",
                customer_id
            )));
        }
        Ok(state.birthdates.get(&customer_id).copied())
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        gateway_response: &Value,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if state.fail_update.contains(&order_id) {
            return Err(StoreError::Statement(format!("update rejected for order {}", order_id)));
        }

        state.statuses.insert(order_id, status);
        state.updates.push(StatusUpdate {
            order_id,
            status,
            gateway_response: gateway_response.clone(),
            processed_at: Utc::now(),
        });
        Ok(())
    }
}
