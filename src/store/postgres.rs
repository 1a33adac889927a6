//! PostgreSQL store backed by a `sqlx::PgPool`.

use super::{PaymentStore, SqlParam};
use crate::error::StoreError;
use crate::models::{Order, OrderStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Postgres};
use std::time::Duration;
use tracing::{debug, info};

/// Gateway PAGCOMPLETO in `gateways`.
const PAGCOMPLETO_GATEWAY_ID: i64 = 1;
/// Cartão de crédito in `formas_pagamento`.
const CREDIT_CARD_METHOD_ID: i64 = 3;

/// Binds every `SqlParam` in order, as `$1`, `$2`, ...
/// Works for both `sqlx::query` and `sqlx::query_as` builders.
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }};
}

const PENDING_ORDERS_SQL: &str = "
    SELECT
        p.id::int8                   AS id,
        p.valor_total::float8        AS total_amount,
        p.valor_frete::float8        AS freight_amount,
        p.data::timestamp            AS created_at,
        p.id_cliente::int8           AS customer_id,
        p.id_loja::int8              AS store_id,
        pp.id::int8                  AS payment_id,
        pp.id_formapagto::int8       AS payment_method_id,
        fg.descricao::text           AS payment_method,
        pp.qtd_parcelas::int4        AS installments,
        pp.num_cartao::text          AS card_number,
        pp.nome_portador::text       AS card_holder_name,
        pp.codigo_verificacao::text  AS card_cvv,
        pp.vencimento::text          AS card_expiry,
        c.nome::text                 AS customer_name,
        c.cpf_cnpj::text             AS customer_document,
        c.email::text                AS customer_email,
        c.tipo_pessoa::text          AS person_type,
        g.endpoint::text             AS endpoint
    FROM pedidos p
    INNER JOIN pedidos_pagamentos pp ON p.id = pp.id_pedido
    INNER JOIN clientes c ON p.id_cliente = c.id
    INNER JOIN formas_pagamento fg ON pp.id_formapagto = fg.id
    INNER JOIN lojas_gateway lg ON p.id_loja = lg.id_loja
    INNER JOIN gateways g ON lg.id_gateway = g.id
    WHERE p.id_situacao = $1
      AND g.id = $2
      AND pp.id_formapagto = $3
    ORDER BY p.id
";

const BIRTHDATE_SQL: &str = "SELECT data_nasc::date AS birthdate FROM clientes WHERE id = $1";

const UPDATE_ORDER_SQL: &str = "UPDATE pedidos SET id_situacao = $1 WHERE id = $2";

const UPDATE_PAYMENT_SQL: &str = "
    UPDATE pedidos_pagamentos
    SET retorno_intermediador = $1, data_processamento = NOW()
    WHERE id_pedido = $2
";

#[derive(Debug, FromRow)]
struct BirthdateRow {
    birthdate: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!("Connected to PostgreSQL (max {} connections)", max_connections);
        Ok(Self::new(pool))
    }

    /// Runs a parameterized statement and decodes every returned row.
    pub async fn query<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>, StoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let rows = bind_params!(sqlx::query_as::<_, T>(sql), params)
            .fetch_all(&self.pool)
            .await?;
        debug!("query returned {} rows", rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    async fn fetch_pending_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.query(
            PENDING_ORDERS_SQL,
            &[
                OrderStatus::AwaitingPayment.code().into(),
                PAGCOMPLETO_GATEWAY_ID.into(),
                CREDIT_CARD_METHOD_ID.into(),
            ],
        )
        .await
    }

    async fn fetch_customer_birthdate(&self, customer_id: i64) -> Result<Option<NaiveDate>, StoreError> {
        let rows: Vec<BirthdateRow> = self.query(BIRTHDATE_SQL, &[customer_id.into()]).await?;
        Ok(rows.into_iter().next().and_then(|row| row.birthdate))
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        gateway_response: &Value,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let order_params: [SqlParam; 2] = [status.code().into(), order_id.into()];
        bind_params!(sqlx::query(UPDATE_ORDER_SQL), &order_params)
            .execute(&mut *tx)
            .await?;

        let payment_params: [SqlParam; 2] = [gateway_response.to_string().into(), order_id.into()];
        bind_params!(sqlx::query(UPDATE_PAYMENT_SQL), &payment_params)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
