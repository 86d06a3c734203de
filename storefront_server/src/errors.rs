use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use storefront_engine::{
    db_types::AuthorizationError,
    traits::{AccountApiError, CartApiError, CatalogApiError, GatewayError, OrderApiError, OrderFlowError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Could not complete checkout. {0}")]
    CannotCompleteCheckout(String),
    #[error("Payment gateway error. {0}")]
    PaymentGatewayError(String),
    #[error("Conflicting order state. {0}")]
    OrderStateConflict(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CannotCompleteCheckout(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingIdentityHeader => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedHeader(_) => StatusCode::BAD_REQUEST,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::OrderStateConflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No identity headers were provided with the request.")]
    MissingIdentityHeader,
    #[error("Identity headers are not in the correct format. {0}")]
    PoorlyFormattedHeader(String),
}

impl From<AuthorizationError> for ServerError {
    fn from(e: AuthorizationError) -> Self {
        match e {
            AuthorizationError::Unauthenticated => Self::AuthenticationError(AuthError::MissingIdentityHeader),
            AuthorizationError::RoleRequired(_) | AuthorizationError::NotOwner => {
                Self::InsufficientPermissions(e.to_string())
            },
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(msg) => Self::BackendError(msg),
            OrderFlowError::CartEmpty => Self::CannotCompleteCheckout(OrderFlowError::CartEmpty.to_string()),
            e @ OrderFlowError::InsufficientStock { .. } => Self::CannotCompleteCheckout(e.to_string()),
            OrderFlowError::Gateway(e) => match e {
                GatewayError::Unavailable(_) => Self::PaymentGatewayError(e.to_string()),
                GatewayError::Rejected(_) => Self::PaymentGatewayError(e.to_string()),
            },
            e @ OrderFlowError::OrderNotFound { .. } => Self::NoRecordFound(e.to_string()),
            e @ OrderFlowError::IllegalTransition { .. } => Self::OrderStateConflict(e.to_string()),
            OrderFlowError::Unauthorized(e) => e.into(),
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<CartApiError> for ServerError {
    fn from(e: CartApiError) -> Self {
        match e {
            CartApiError::DatabaseError(msg) => Self::BackendError(msg),
            e @ CartApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            e @ CartApiError::OutOfStock { .. } => Self::InvalidRequestBody(e.to_string()),
            e @ CartApiError::ItemNotFound(_) => Self::NoRecordFound(e.to_string()),
            e @ CartApiError::NegativeQuantity => Self::InvalidRequestBody(e.to_string()),
            CartApiError::Unauthorized(e) => e.into(),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(msg) => Self::BackendError(msg),
            e @ CatalogApiError::ProductNotFound(_) => Self::NoRecordFound(e.to_string()),
            e @ CatalogApiError::EmptyUpdate => Self::InvalidRequestBody(e.to_string()),
            CatalogApiError::Unauthorized(e) => e.into(),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::DatabaseError(msg) => Self::BackendError(msg),
            e @ OrderApiError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderApiError::Unauthorized(e) => e.into(),
        }
    }
}
