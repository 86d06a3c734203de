//----------------------------------------------   Payment webhook  ----------------------------------------------------

use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info, trace, warn};
use storefront_engine::{
    order_objects::{PaymentOutcome, VerifiedPaymentEvent},
    traits::{OrderFlowError, PaymentGateway, StoreDatabase},
    OrderFlowApi,
};

use crate::{
    config::RazorpayConfig,
    data_objects::{JsonResponse, WebhookEvent},
    helpers::verify_webhook_signature,
    route,
};

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

route!(payment_webhook => Post "/webhook/payment" impl StoreDatabase, PaymentGateway);
/// The payment provider's webhook endpoint. This is the adversarial edge of the system, so it fails closed:
/// * no configured shared secret: `500`, nothing is processed;
/// * missing signature header: `401`;
/// * signature mismatch over the raw body, or a body that isn't valid JSON: `400`;
/// * everything else, including unhandled event types, incomplete metadata and already-processed events, is
///   acknowledged with `200` so the provider stops retrying. Only a local database failure returns `500`, since a
///   retry can genuinely help there.
pub async fn payment_webhook<B, G>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B, G>>,
    config: web::Data<RazorpayConfig>,
) -> HttpResponse
where
    B: StoreDatabase,
    G: PaymentGateway,
{
    trace!("🔔️ Received webhook request: {}", req.uri());
    let secret = config.webhook_secret.reveal();
    if secret.is_empty() {
        warn!("🔔️ Webhook received but no webhook secret is configured. Rejecting.");
        return HttpResponse::InternalServerError()
            .json(JsonResponse::failure("Webhook signing is not configured on this server"));
    }
    let Some(claimed) = req.headers().get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("🔔️ Webhook request without a signature header. Rejecting.");
        return HttpResponse::Unauthorized().json(JsonResponse::failure("Missing signature"));
    };
    if !verify_webhook_signature(secret, &body, claimed) {
        warn!("🔔️ Webhook signature verification failed. Rejecting.");
        return HttpResponse::BadRequest().json(JsonResponse::failure("Invalid signature"));
    }
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("🔔️ Webhook payload is not valid JSON. {e}");
            return HttpResponse::BadRequest().json(JsonResponse::failure("Malformed payload"));
        },
    };
    // New provider event types must not break the endpoint, so anything unrecognized is acknowledged as-is.
    let outcome = match event.event.as_str() {
        "payment.captured" => PaymentOutcome::Captured,
        "payment.failed" => PaymentOutcome::Failed,
        other => {
            info!("🔔️ Unhandled webhook event type '{other}'. Acknowledging without action.");
            return HttpResponse::Ok().json(JsonResponse::success("Event acknowledged"));
        },
    };
    let entity = event.payload.payment.entity;
    let (Some(order_id), Some(user_id)) = (entity.notes.internal_order_id, entity.notes.user_id) else {
        warn!("🔔️ Webhook event '{}' for payment {} is missing order metadata. Acknowledging without action.", event.event, entity.id);
        return HttpResponse::Ok().json(JsonResponse::success("Event acknowledged"));
    };
    let reference = entity.order_id.unwrap_or(entity.id);
    let verified = VerifiedPaymentEvent { order_id, user_id, reference, outcome };
    match api.apply_gateway_event(verified).await {
        Ok(order) => {
            info!("🔔️ Payment {outcome} applied to order #{}. New status: '{}'.", order.id, order.status);
            HttpResponse::Ok().json(JsonResponse::success(format!("Order {} is now '{}'", order.id, order.status)))
        },
        Err(OrderFlowError::IllegalTransition { order_id, status }) => {
            info!("🔔️ Webhook event for order #{order_id} is a no-op; the order is already '{status}'.");
            HttpResponse::Ok().json(JsonResponse::success("Event already processed"))
        },
        Err(OrderFlowError::OrderNotFound { order_id, reference }) => {
            warn!("🔔️ Webhook event does not match any order (id {order_id}, reference [{reference}]). Possible forgery or stale event.");
            HttpResponse::Ok().json(JsonResponse::success("Event does not match any order"))
        },
        Err(OrderFlowError::DatabaseError(e)) => {
            warn!("🔔️ Could not apply webhook event. {e}");
            HttpResponse::InternalServerError().json(JsonResponse::failure("Datastore unavailable"))
        },
        Err(e) => {
            debug!("🔔️ Unexpected error while handling webhook event. {e}");
            HttpResponse::Ok().json(JsonResponse::failure("Unexpected error handling event"))
        },
    }
}
