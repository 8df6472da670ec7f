use crate::auth::claims::AuthUser;
use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::UserAgent;
use std::{net::SocketAddr, time::Instant};
use tracing::{info, warn};

/// Ticket code addressed by a `/api/tickets/{code}/...` path, if any.
fn ticket_code(path: &str) -> Option<&str> {
    path.strip_prefix("/api/tickets/")?
        .split('/')
        .next()
        .filter(|code| !code.is_empty())
}

/// Logs every request once it has been answered: method, path, ticket code,
/// caller (`anonymous` without a valid token), client IP, status and latency.
/// Server errors are logged at `warn`. CORS preflight `OPTIONS` requests are
/// passed through silently.
///
/// Needs `ConnectInfo`, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let started = Instant::now();
    let (mut parts, body) = req.into_parts();

    let caller = AuthUser::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|user| format!("{}({})", user.0.username, user.role()))
        .unwrap_or_else(|| "anonymous".into());

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(ua)| ua.to_string())
        .unwrap_or_else(|| "unknown".into());

    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let response = next.run(Request::from_parts(parts, body)).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    let ticket = ticket_code(&path).unwrap_or("-");

    if response.status().is_server_error() {
        warn!(%method, %path, ticket, caller, ip = %addr.ip(), status, latency_ms, user_agent, "Request failed");
    } else {
        info!(%method, %path, ticket, caller, ip = %addr.ip(), status, latency_ms, user_agent, "Request handled");
    }

    response
}
