use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sf_common::Cents;
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// The lifecycle states of an order.
///
/// `Pending → PaymentInitiated → {Confirmed | PaymentFailed}` for online payment modes, or `Pending → Confirmed`
/// directly for cash-on-delivery. `Confirmed`, `PaymentFailed` and `Cancelled` are terminal.
///
/// The status is persisted verbatim as a string, including the spaces in `Payment Initiated` and `Payment Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created and stock reserved, but no payment resolution has happened yet.
    Pending,
    /// A payment intent has been created at the gateway and we are waiting for the outcome.
    #[sqlx(rename = "Payment Initiated")]
    #[serde(rename = "Payment Initiated")]
    PaymentInitiated,
    /// The order is paid (or placed via cash-on-delivery) and ready for fulfilment.
    Confirmed,
    /// The gateway reported a definitive payment failure. Reserved stock has been restored.
    #[sqlx(rename = "Payment Failed")]
    #[serde(rename = "Payment Failed")]
    PaymentFailed,
    /// The order was cancelled by the user or an admin.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::PaymentInitiated => write!(f, "Payment Initiated"),
            OrderStatusType::Confirmed => write!(f, "Confirmed"),
            OrderStatusType::PaymentFailed => write!(f, "Payment Failed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Payment Initiated" => Ok(Self::PaymentInitiated),
            "Confirmed" => Ok(Self::Confirmed),
            "Payment Failed" => Ok(Self::PaymentFailed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------     PaymentMode     ---------------------------------------------------------
/// How the shopper chose to pay for the order. Online modes go through the payment gateway; cash-on-delivery
/// settles synchronously at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentMode {
    OnlineCard,
    OnlineWallet,
    CashOnDelivery,
}

impl PaymentMode {
    pub fn is_online(&self) -> bool {
        matches!(self, PaymentMode::OnlineCard | PaymentMode::OnlineWallet)
    }
}

impl Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMode::OnlineCard => write!(f, "OnlineCard"),
            PaymentMode::OnlineWallet => write!(f, "OnlineWallet"),
            PaymentMode::CashOnDelivery => write!(f, "CashOnDelivery"),
        }
    }
}

impl FromStr for PaymentMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OnlineCard" => Ok(Self::OnlineCard),
            "OnlineWallet" => Ok(Self::OnlineWallet),
            "CashOnDelivery" => Ok(Self::CashOnDelivery),
            s => Err(ConversionError(format!("Invalid payment mode: {s}"))),
        }
    }
}

//--------------------------------------        Role         ---------------------------------------------------------
/// A capability held by a principal. `Customer` is any authenticated shopper; `Admin` unlocks the back-office
/// catalog mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "Customer"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------      Principal      ---------------------------------------------------------
/// The request-scoped identity performing an operation. Every engine operation that acts on behalf of a user takes
/// an explicit `Principal` argument; there is no ambient "current user" state anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: i64, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn customer(user_id: i64) -> Self {
        Self::new(user_id, vec![Role::Customer])
    }

    pub fn admin(user_id: i64) -> Self {
        Self::new(user_id, vec![Role::Customer, Role::Admin])
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn require_role(&self, role: Role) -> Result<(), AuthorizationError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AuthorizationError::RoleRequired(role))
        }
    }

    /// Allows access when the principal owns the resource, or holds the `Admin` role.
    pub fn require_self_or_admin(&self, owner_id: i64) -> Result<(), AuthorizationError> {
        if self.user_id == owner_id || self.has_role(Role::Admin) {
            Ok(())
        } else {
            Err(AuthorizationError::NotOwner)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Insufficient permissions. The {0} role is required")]
    RoleRequired(Role),
    #[error("You do not have access to this resource")]
    NotOwner,
}

//--------------------------------------        User         ---------------------------------------------------------
/// A store account. Accounts are provisioned out of band; the engine only ever reads them.
/// The password hash is an opaque string owned by the (external) session layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Unit price in minor currency units.
    pub price: Cents,
    /// Units available for sale. Never negative; provisionally reduced at order creation.
    pub stock: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Cents,
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A partial update for a product. Only the supplied fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Cents>,
    pub stock: Option<i64>,
    pub image_url: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
    }
}

//--------------------------------------      CartItem       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// A cart item joined with the live product it refers to. This is what checkout and the cart view operate on.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartLine {
    pub cart_item_id: i64,
    pub product_id: i64,
    pub name: String,
    pub unit_price: Cents,
    pub quantity: i64,
    pub stock: i64,
}

impl CartLine {
    pub fn line_total(&self) -> Cents {
        self.unit_price * self.quantity
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
/// A placed order. Orders are mutated only by the order state machine and are never physically deleted.
///
/// `transaction_id` is set iff the order has ever been in `Payment Initiated`; cash-on-delivery orders confirm
/// without one.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total: Cents,
    pub delivery_address: String,
    pub contact_number: String,
    pub payment_mode: PaymentMode,
    pub status: OrderStatusType,
    pub transaction_id: Option<String>,
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
/// An immutable snapshot of one purchased line. `unit_price` is the price at the time of order, deliberately
/// decoupled from the live catalog so historical orders stay accurate.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Cents,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_status_round_trips_verbatim_strings() {
        for (status, s) in [
            (OrderStatusType::Pending, "Pending"),
            (OrderStatusType::PaymentInitiated, "Payment Initiated"),
            (OrderStatusType::Confirmed, "Confirmed"),
            (OrderStatusType::PaymentFailed, "Payment Failed"),
            (OrderStatusType::Cancelled, "Cancelled"),
        ] {
            assert_eq!(status.to_string(), s);
            assert_eq!(s.parse::<OrderStatusType>().unwrap(), status);
        }
    }

    #[test]
    fn principal_checks() {
        let shopper = Principal::customer(7);
        assert!(shopper.require_role(Role::Customer).is_ok());
        assert_eq!(shopper.require_role(Role::Admin), Err(AuthorizationError::RoleRequired(Role::Admin)));
        assert!(shopper.require_self_or_admin(7).is_ok());
        assert_eq!(shopper.require_self_or_admin(8), Err(AuthorizationError::NotOwner));
        assert!(Principal::admin(1).require_self_or_admin(8).is_ok());
    }

    #[test]
    fn payment_mode_online() {
        assert!(PaymentMode::OnlineCard.is_online());
        assert!(PaymentMode::OnlineWallet.is_online());
        assert!(!PaymentMode::CashOnDelivery.is_online());
    }
}
