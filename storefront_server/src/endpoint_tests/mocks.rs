use mockall::mock;
use storefront_engine::traits::{GatewayError, IntentRequest, PaymentGateway, PaymentIntent};

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, GatewayError>;
    }
}
