use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use std::convert::Infallible;

use crate::auth::{claims::AuthUser, decode_jwt, token_from_headers};
use crate::response::{ApiError, api_error};

/// Extracts the caller from request extensions, or decodes the token directly
/// when the access policy did not run (e.g. inside other middleware).
///
/// # Errors
/// `401 Unauthorized` if no token is present or it is invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Authentication required"))?;

        decode_jwt(&token)
            .map(AuthUser)
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

/// Caller identity on public routes: `Some` when a valid token came along.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
