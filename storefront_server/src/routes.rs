//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use sf_common::DEFAULT_CURRENCY_CODE;
use storefront_engine::{
    db_types::{NewProduct, ProductUpdate},
    order_objects::NewCheckout,
    traits::{AccountManagement, CartManagement, CatalogManagement, PaymentGateway, StoreDatabase},
    CartApi,
    CatalogApi,
    OrderFlowApi,
};

use crate::{
    auth::AuthenticatedUser,
    data_objects::{AddToCartRequest, CartQuantityUpdate, CheckoutRequest, CheckoutResponse, JsonResponse, PaymentSession},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

//----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl StoreDatabase, PaymentGateway);
/// Converts the caller's cart into an order. For online payment modes the response carries the payment session
/// (gateway key, intent reference, amount and customer details) the frontend needs to open the provider's widget;
/// for cash-on-delivery the order comes back already confirmed.
pub async fn checkout<B, G>(
    user: AuthenticatedUser,
    body: web::Json<CheckoutRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: StoreDatabase,
    G: PaymentGateway,
{
    let request = body.into_inner();
    debug!("💻️ POST checkout for user {} via {}", user.user_id, request.payment_mode);
    let checkout = NewCheckout {
        user_id: user.user_id,
        delivery_address: request.delivery_address,
        contact_number: request.contact_number,
        payment_mode: request.payment_mode,
        currency: request.currency.unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string()),
    };
    let outcome = api.checkout(&user, checkout).await?;
    let payment = match outcome.payment {
        Some(intent) => {
            let customer = api
                .db()
                .fetch_user(user.user_id)
                .await?
                .ok_or_else(|| ServerError::BackendError(format!("No account for user {}", user.user_id)))?;
            Some(PaymentSession {
                gateway_key: intent.client_key,
                reference: intent.reference,
                amount: outcome.order.total,
                order_id: outcome.order.id,
                customer_name: customer.username,
                customer_email: customer.email,
                customer_contact: outcome.order.contact_number.clone(),
            })
        },
        None => None,
    };
    Ok(HttpResponse::Ok().json(CheckoutResponse { order: outcome.order, payment }))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(my_cart => Get "/cart" impl CartManagement);
pub async fn my_cart<B: CartManagement>(
    user: AuthenticatedUser,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let lines = api.fetch_cart(&user).await?;
    Ok(HttpResponse::Ok().json(lines))
}

route!(add_to_cart => Post "/cart" impl CartManagement);
pub async fn add_to_cart<B: CartManagement>(
    user: AuthenticatedUser,
    body: web::Json<AddToCartRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let item = api.add_to_cart(&user, body.product_id).await?;
    Ok(HttpResponse::Ok().json(item))
}

route!(update_cart_item => Put "/cart/{id}" impl CartManagement);
pub async fn update_cart_item<B: CartManagement>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<CartQuantityUpdate>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let cart_item_id = path.into_inner();
    match api.set_quantity(&user, cart_item_id, body.quantity).await? {
        Some(item) => Ok(HttpResponse::Ok().json(item)),
        None => Ok(HttpResponse::Ok().json(JsonResponse::success("Item removed from cart"))),
    }
}

route!(remove_cart_item => Delete "/cart/{id}" impl CartManagement);
pub async fn remove_cart_item<B: CartManagement>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.remove_item(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Item removed from cart")))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(product_list => Get "/products" impl CatalogManagement);
pub async fn product_list<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let products = api.fetch_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product_detail => Get "/products/{id}" impl CatalogManagement);
pub async fn product_detail<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.fetch_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(create_product => Post "/products" impl CatalogManagement);
pub async fn create_product<B: CatalogManagement>(
    user: AuthenticatedUser,
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.add_product(&user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_product => Patch "/products/{id}" impl CatalogManagement);
pub async fn update_product<B: CatalogManagement>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = api.update_product(&user, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/products/{id}" impl CatalogManagement);
pub async fn delete_product<B: CatalogManagement>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    api.delete_product(&user, product_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Product {product_id} deleted"))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(my_orders => Get "/orders" impl StoreDatabase, PaymentGateway);
pub async fn my_orders<B, G>(
    user: AuthenticatedUser,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: StoreDatabase,
    G: PaymentGateway,
{
    let orders = api.my_orders(&user).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{id}" impl StoreDatabase, PaymentGateway);
pub async fn order_by_id<B, G>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: StoreDatabase,
    G: PaymentGateway,
{
    let order = api.fetch_order(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_items => Get "/orders/{id}/items" impl StoreDatabase, PaymentGateway);
pub async fn order_items<B, G>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: StoreDatabase,
    G: PaymentGateway,
{
    let items = api.fetch_order_items(&user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(items))
}
