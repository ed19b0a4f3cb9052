//! Authentication extractors.
//!
//! - `AuthUser` - the end user, already authenticated upstream
//! - `ServiceAuth` - the application layer, via API key
//!
//! Identity verification belongs to the account system; this service only
//! needs to know which user a request acts for.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use homehome_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Bearer token prefix carrying the user id.
pub const USER_TOKEN_PREFIX: &str = "test-token:";

/// The user a request acts for.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or(ApiError::Unauthorized)?;

            let user_id = token
                .strip_prefix(USER_TOKEN_PREFIX)
                .and_then(|id| id.parse::<UserId>().ok())
                .ok_or(ApiError::Unauthorized)?;

            Ok(AuthUser { user_id })
        })
    }
}

/// Application-layer authentication via API key.
///
/// Used for reward credits and purchases that end users must not trigger
/// directly.
#[derive(Debug, Clone)]
pub struct ServiceAuth {
    /// The calling service, from `X-Service-Name`.
    pub service_name: String,
}

impl FromRequestParts<Arc<AppState>> for ServiceAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let api_key = parts
                .headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            let expected_key = state
                .config
                .service_api_key
                .as_ref()
                .ok_or(ApiError::Unauthorized)?;

            if api_key != expected_key {
                return Err(ApiError::Unauthorized);
            }

            let service_name = parts
                .headers
                .get("x-service-name")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();

            Ok(ServiceAuth { service_name })
        })
    }
}
