//! A scriptable in-memory payment gateway for tests.

use crate::traits::{GatewayError, IntentRequest, PaymentGateway, PaymentIntent};

#[derive(Debug, Clone)]
pub enum TestGateway {
    /// Always issues an intent with the given reference.
    Succeeding { reference: String },
    /// Simulates the gateway being unreachable.
    Unavailable,
    /// Simulates the gateway rejecting the intent request.
    Rejected,
}

impl TestGateway {
    pub fn succeeding<S: Into<String>>(reference: S) -> Self {
        TestGateway::Succeeding { reference: reference.into() }
    }

    pub fn unavailable() -> Self {
        TestGateway::Unavailable
    }

    pub fn rejected() -> Self {
        TestGateway::Rejected
    }
}

impl PaymentGateway for TestGateway {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, GatewayError> {
        match self {
            TestGateway::Succeeding { reference } => Ok(PaymentIntent {
                reference: reference.clone(),
                client_key: format!("key_test_{}", request.order_id),
            }),
            TestGateway::Unavailable => Err(GatewayError::Unavailable("connection timed out".to_string())),
            TestGateway::Rejected => Err(GatewayError::Rejected("amount exceeds limit".to_string())),
        }
    }
}
