//! Request identity extraction.
//!
//! The storefront sits behind a session-terminating frontend that authenticates shoppers and forwards their
//! identity in trusted headers: `X-Store-User` carries the user id, and `X-Store-Roles` an optional comma-separated
//! role list (defaulting to `customer`). The server converts these into an engine [`Principal`]; all actual
//! permission checks live in the engine APIs.

use std::{
    future::{ready, Ready},
    ops::Deref,
    str::FromStr,
};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use storefront_engine::db_types::{Principal, Role};

use crate::errors::{AuthError, ServerError};

pub const USER_HEADER: &str = "X-Store-User";
pub const ROLES_HEADER: &str = "X-Store-Roles";

/// The authenticated shopper making the request. Deref's to the engine's [`Principal`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

impl Deref for AuthenticatedUser {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from_headers(req).map(AuthenticatedUser))
    }
}

fn principal_from_headers(req: &HttpRequest) -> Result<Principal, ServerError> {
    let user_id = req
        .headers()
        .get(USER_HEADER)
        .ok_or(AuthError::MissingIdentityHeader)?
        .to_str()
        .map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string()))?
        .parse::<i64>()
        .map_err(|e| AuthError::PoorlyFormattedHeader(format!("{USER_HEADER} must be an integer id. {e}")))?;
    let roles = match req.headers().get(ROLES_HEADER) {
        None => vec![Role::Customer],
        Some(value) => {
            let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string()))?;
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Role::from_str)
                .collect::<Result<Vec<Role>, _>>()
                .map_err(|e| AuthError::PoorlyFormattedHeader(e.to_string()))?
        },
    };
    Ok(Principal::new(user_id, roles))
}
