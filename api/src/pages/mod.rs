//! Server-rendered staff dashboards.
//!
//! Templates are compiled into the binary and registered once. Access rules for
//! these routes live in the access policy like every API route; unauthenticated
//! visitors are redirected to `/login` there.

pub mod views;

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::json;
use tracing::error;
use util::state::AppState;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("templates/layout.hbs")),
    ("ticket_table", include_str!("templates/ticket_table.hbs")),
    ("login", include_str!("templates/login.hbs")),
    ("dashboard", include_str!("templates/dashboard.hbs")),
    ("tickets", include_str!("templates/tickets.hbs")),
    ("masters", include_str!("templates/masters.hbs")),
    ("users", include_str!("templates/users.hbs")),
    ("error", include_str!("templates/error.hbs")),
];

static REGISTRY: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut registry = Handlebars::new();
    for (name, source) in TEMPLATES {
        if let Err(e) = registry.register_template_string(name, *source) {
            error!(template = name, error = %e, "Failed to compile template");
        }
    }
    registry
});

/// Renders a registered template into an HTML response.
pub fn render<T: Serialize>(status: StatusCode, template: &str, data: &T) -> Response {
    match REGISTRY.render(template, data) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(template, error = %e, "Failed to render template");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Internal server error</h1>".to_string()),
            )
                .into_response()
        }
    }
}

pub fn forbidden(message: &str) -> Response {
    render(
        StatusCode::FORBIDDEN,
        "error",
        &json!({ "title": "Access denied", "message": message }),
    )
}

/// Builds the dashboard page routes.
///
/// - `GET /` → redirect to `/dashboard`
/// - `GET /login`, `POST /login` → staff login form
/// - `GET /logout` → clear session
/// - `GET /dashboard` → statistics and latest tickets
/// - `GET /dashboard/tickets` → ticket list
/// - `GET /dashboard/masters` → technicians and their load
/// - `GET /dashboard/users` → staff directory
pub fn pages_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(views::index))
        .route("/login", get(views::login_page).post(views::login_submit))
        .route("/logout", get(views::logout))
        .route("/dashboard", get(views::dashboard))
        .route("/dashboard/tickets", get(views::tickets))
        .route("/dashboard/masters", get(views::masters))
        .route("/dashboard/users", get(views::users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_compile() {
        for (name, _) in TEMPLATES {
            assert!(REGISTRY.has_template(name), "template {name} missing");
        }
    }

    #[test]
    fn login_page_renders_error_without_staff_header() {
        let html = REGISTRY
            .render("login", &json!({ "error": "Invalid username or password" }))
            .unwrap();
        assert!(html.contains("Invalid username or password"));
        assert!(html.contains("action=\"/login\""));
        assert!(!html.contains("Log out"));
    }

    #[test]
    fn ticket_table_renders_rows_and_empty_state() {
        let html = REGISTRY
            .render(
                "tickets",
                &json!({
                    "user": { "username": "olga", "role": "manager" },
                    "tickets": [{
                        "code": "RQ00A1B2",
                        "device": "Laptop Lenovo",
                        "status_label": "In Repair",
                        "priority": "high",
                        "technician": null,
                        "is_archived": false,
                        "created_at": "2025-10-01 10:00"
                    }],
                    "total": 1
                }),
            )
            .unwrap();
        assert!(html.contains("RQ00A1B2"));
        assert!(html.contains("In Repair"));
        assert!(html.contains("unassigned"));
        assert!(html.contains("olga (manager)"));

        let empty = REGISTRY
            .render("tickets", &json!({ "tickets": [], "total": 0 }))
            .unwrap();
        assert!(empty.contains("No tickets"));
    }

    #[test]
    fn forbidden_page_has_403_status() {
        let response = forbidden("Insufficient permissions");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
