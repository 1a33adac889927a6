use thiserror::Error;

/// Rejection produced by the payment validator. The display text is shown
/// verbatim in the batch report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Campo obrigatório ausente: {0}")]
    MissingField(&'static str),
    #[error("Número do cartão inválido")]
    InvalidCardNumber,
    #[error("CVV inválido")]
    InvalidCvv,
    #[error("Data de validade do cartão inválida")]
    InvalidExpiry,
    #[error("E-mail do cliente inválido")]
    InvalidEmail,
    #[error("CPF do cliente inválido")]
    InvalidCpf,
}

/// Failure talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be reached (DNS, connect, TLS, timeout).
    #[error("gateway unreachable: {0}")]
    Transport(String),
    /// The gateway answered but the body is not a JSON object.
    #[error("malformed gateway payload: {0}")]
    Protocol(String),
}

impl GatewayError {
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        // the URL carries the access token
        let e = e.without_url();
        if e.is_decode() {
            GatewayError::Protocol(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Connection(String),
    #[error("statement failed: {0}")]
    Statement(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(e.to_string()),
            other => StoreError::Statement(other.to_string()),
        }
    }
}

/// Why an order could not be turned into a charge request.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure that aborts a whole batch before any order is charged.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("falha ao buscar pedidos pendentes")]
    FetchPendingOrders(#[source] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
