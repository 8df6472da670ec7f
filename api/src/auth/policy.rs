//! Route access policy.
//!
//! Every matched route must have a row in [`POLICY`]; a matched route without
//! one is denied and logged. The middleware runs once per request, decodes the
//! caller when a valid token is present (also on public routes) and stores it
//! as an [`AuthUser`] extension for the handlers.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use db::models::user::Role;
use tracing::warn;

use crate::auth::{AuthUser, authenticate};
use crate::pages;
use crate::response::api_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

const STAFF: Access = Access::Roles(Role::STAFF);
const MANAGEMENT: Access = Access::Roles(Role::MANAGEMENT);
const ADMINS: Access = Access::Roles(Role::ADMINS);

/// `(method, matched route pattern, access)`.
pub static POLICY: &[(Method, &str, Access)] = &[
    (Method::GET, "/api/health", Access::Public),
    // auth
    (Method::POST, "/api/auth/login", Access::Public),
    (Method::POST, "/api/auth/logout", Access::Public),
    (Method::GET, "/api/auth/profile", Access::Authenticated),
    // tickets
    (Method::POST, "/api/tickets", Access::Public),
    (Method::GET, "/api/tickets/{code}/status", Access::Public),
    (Method::GET, "/api/tickets", STAFF),
    (Method::GET, "/api/tickets/{code}", STAFF),
    (Method::PUT, "/api/tickets/{code}", STAFF),
    (Method::PUT, "/api/tickets/{code}/status", STAFF),
    (Method::POST, "/api/tickets/{code}/archive", MANAGEMENT),
    (Method::POST, "/api/tickets/{code}/assign-master", MANAGEMENT),
    (Method::DELETE, "/api/tickets/{code}/assign-master", MANAGEMENT),
    (Method::GET, "/api/tickets/{code}/history", STAFF),
    (Method::GET, "/api/tickets/{code}/assignments", STAFF),
    // stats
    (Method::GET, "/api/stats", STAFF),
    // masters
    (Method::GET, "/api/masters/available", STAFF),
    (Method::GET, "/api/masters/{id}/workload", STAFF),
    (Method::GET, "/api/masters/{id}/skills", STAFF),
    (Method::PUT, "/api/masters/{id}/skills", ADMINS),
    (Method::PUT, "/api/masters/{id}/availability", MANAGEMENT),
    // clients
    (Method::GET, "/api/clients", STAFF),
    (Method::POST, "/api/clients", MANAGEMENT),
    (Method::GET, "/api/clients/statistics", STAFF),
    (Method::GET, "/api/clients/vip", STAFF),
    (Method::GET, "/api/clients/{id}", STAFF),
    (Method::PUT, "/api/clients/{id}", STAFF),
    (Method::DELETE, "/api/clients/{id}", ADMINS),
    (Method::GET, "/api/clients/{id}/tickets", STAFF),
    // users
    (Method::GET, "/api/users", ADMINS),
    (Method::POST, "/api/users", ADMINS),
    (Method::GET, "/api/users/statistics", ADMINS),
    (Method::GET, "/api/users/{id}", ADMINS),
    (Method::PUT, "/api/users/{id}", ADMINS),
    (Method::DELETE, "/api/users/{id}", ADMINS),
    (Method::POST, "/api/users/{id}/activate", ADMINS),
    (Method::POST, "/api/users/{id}/deactivate", ADMINS),
    // pages
    (Method::GET, "/", Access::Public),
    (Method::GET, "/login", Access::Public),
    (Method::POST, "/login", Access::Public),
    (Method::GET, "/logout", Access::Public),
    (Method::GET, "/dashboard", STAFF),
    (Method::GET, "/dashboard/tickets", STAFF),
    (Method::GET, "/dashboard/masters", STAFF),
    (Method::GET, "/dashboard/users", ADMINS),
];

/// Looks up the access rule of a route. `HEAD` follows the `GET` rule.
pub fn lookup(method: &Method, pattern: &str) -> Option<Access> {
    let method = if method == Method::HEAD {
        &Method::GET
    } else {
        method
    };

    POLICY
        .iter()
        .find(|(m, p, _)| m == method && *p == pattern)
        .map(|(_, _, access)| *access)
}

fn deny(status: StatusCode, is_page: bool, message: &str) -> Response {
    if !is_page {
        return api_error(status, message).into_response();
    }

    if status == StatusCode::UNAUTHORIZED {
        Redirect::to("/login").into_response()
    } else {
        pages::forbidden(message)
    }
}

/// Enforces [`POLICY`] for the matched route.
///
/// Unmatched requests pass through so the router can answer `404`/`405`.
pub async fn enforce_access_policy(mut req: Request<Body>, next: Next) -> Response {
    let Some(pattern) = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
    else {
        return next.run(req).await;
    };

    let is_page = !pattern.starts_with("/api");
    let user = authenticate(req.headers());
    if let Some(user) = &user {
        req.extensions_mut().insert(user.clone());
    }

    match lookup(req.method(), &pattern) {
        None => {
            warn!(
                method = %req.method(),
                route = %pattern,
                "Route has no access rule; denying"
            );
            deny(StatusCode::FORBIDDEN, is_page, "Access denied")
        }
        Some(Access::Public) => next.run(req).await,
        Some(Access::Authenticated) => match user {
            Some(_) => next.run(req).await,
            None => deny(StatusCode::UNAUTHORIZED, is_page, "Authentication required"),
        },
        Some(Access::Roles(roles)) => match user {
            None => deny(StatusCode::UNAUTHORIZED, is_page, "Authentication required"),
            Some(AuthUser(claims)) if !roles.contains(&claims.role) => {
                deny(StatusCode::FORBIDDEN, is_page, "Insufficient permissions")
            }
            Some(_) => next.run(req).await,
        },
    }
}
