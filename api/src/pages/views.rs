use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use db::models::repair_ticket::{Model as TicketModel, TicketFilter};
use db::models::user::{Model as UserModel, Role, UserFilter};
use db::statistics;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::{error, info};
use util::state::AppState;

use super::render;
use crate::auth::{AuthUser, MaybeAuthUser, clear_session, generate_jwt, session_cookie};

fn page_context(user: &AuthUser) -> Value {
    json!({
        "user": { "id": user.id(), "username": user.0.username, "role": user.role() },
        "can_manage_users": user.has_any_role(Role::ADMINS),
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

fn server_error(context: &str, e: impl std::fmt::Display) -> Response {
    error!(error = %e, "{context}");
    render(
        StatusCode::INTERNAL_SERVER_ERROR,
        "error",
        &json!({ "title": "Something went wrong", "message": "Please try again later." }),
    )
}

/// Flattens tickets for the shared ticket table.
fn ticket_rows(tickets: &[TicketModel], technicians: &HashMap<i64, String>) -> Vec<Value> {
    tickets
        .iter()
        .map(|t| {
            json!({
                "code": t.code,
                "device": t.device_label(),
                "status_label": t.status.label(),
                "priority": t.priority,
                "technician": t.assigned_technician_id.and_then(|id| technicians.get(&id)),
                "is_archived": t.is_archived,
                "created_at": t.created_at.format("%Y-%m-%d %H:%M").to_string(),
            })
        })
        .collect()
}

async fn technician_names(state: &AppState) -> Result<HashMap<i64, String>, sea_orm::DbErr> {
    Ok(UserModel::list(
        state.db(),
        UserFilter {
            role: Some(Role::Master),
            ..Default::default()
        },
    )
    .await?
    .into_iter()
    .map(|u| (u.id, u.full_name))
    .collect())
}

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login
pub async fn login_page(MaybeAuthUser(user): MaybeAuthUser) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    render(StatusCode::OK, "login", &json!({}))
}

/// POST /login
///
/// Form login for the dashboards. Sets the session cookie and redirects on
/// success; re-renders the form with `401` otherwise.
pub async fn login_submit(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match UserModel::verify_credentials(app_state.db(), form.username.trim(), &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return render(
                StatusCode::UNAUTHORIZED,
                "login",
                &json!({ "error": "Invalid username or password", "username": form.username }),
            );
        }
        Err(e) => return server_error("Login lookup failed", e),
    };

    match generate_jwt(user.id, &user.username, user.role) {
        Ok((token, _)) => {
            info!(user_id = user.id, "Dashboard login");
            (jar.add(session_cookie(token)), Redirect::to("/dashboard")).into_response()
        }
        Err(e) => server_error("Token encoding failed", e),
    }
}

/// GET /logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (clear_session(jar), Redirect::to("/login"))
}

/// GET /dashboard
pub async fn dashboard(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let db = app_state.db();

    let stats = match statistics::dashboard(db).await {
        Ok(stats) => stats,
        Err(e) => return server_error("Failed to load dashboard statistics", e),
    };
    let recent = match TicketModel::recent(db, 5).await {
        Ok(tickets) => tickets,
        Err(e) => return server_error("Failed to load recent tickets", e),
    };
    let names = match technician_names(&app_state).await {
        Ok(names) => names,
        Err(e) => return server_error("Failed to load technicians", e),
    };

    let context = merge(
        page_context(&user),
        json!({ "stats": stats, "recent": ticket_rows(&recent, &names) }),
    );
    render(StatusCode::OK, "dashboard", &context)
}

#[derive(Debug, Deserialize)]
pub struct TicketsPageQuery {
    pub include_archived: Option<bool>,
}

/// GET /dashboard/tickets
pub async fn tickets(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TicketsPageQuery>,
) -> Response {
    let include_archived = query.include_archived.unwrap_or(false);
    let filter = TicketFilter {
        include_archived,
        per_page: 100,
        ..Default::default()
    };

    let (tickets, total) = match TicketModel::search(app_state.db(), &filter).await {
        Ok(result) => result,
        Err(e) => return server_error("Failed to list tickets", e),
    };
    let names = match technician_names(&app_state).await {
        Ok(names) => names,
        Err(e) => return server_error("Failed to load technicians", e),
    };

    let context = merge(
        page_context(&user),
        json!({
            "tickets": ticket_rows(&tickets, &names),
            "total": total,
            "include_archived": include_archived,
        }),
    );
    render(StatusCode::OK, "tickets", &context)
}

/// GET /dashboard/masters
pub async fn masters(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let masters = match UserModel::list(
        app_state.db(),
        UserFilter {
            role: Some(Role::Master),
            is_active: Some(true),
            ..Default::default()
        },
    )
    .await
    {
        Ok(masters) => masters,
        Err(e) => return server_error("Failed to list masters", e),
    };

    let rows: Vec<Value> = masters
        .iter()
        .map(|m| {
            json!({
                "username": m.username,
                "full_name": m.full_name,
                "specialization": m.specialization,
                "active_ticket_count": m.active_ticket_count,
                "max_concurrent_tickets": m.max_concurrent_tickets,
                "has_capacity": m.has_capacity(),
            })
        })
        .collect();

    render(
        StatusCode::OK,
        "masters",
        &merge(page_context(&user), json!({ "masters": rows })),
    )
}

/// GET /dashboard/users
pub async fn users(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let users = match UserModel::list(app_state.db(), UserFilter::default()).await {
        Ok(users) => users,
        Err(e) => return server_error("Failed to list users", e),
    };

    let rows: Vec<Value> = users
        .iter()
        .map(|u| {
            json!({
                "username": u.username,
                "full_name": u.full_name,
                "email": u.email,
                "role": u.role,
                "is_active": u.is_active,
                "last_login": u.last_login.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            })
        })
        .collect();

    render(
        StatusCode::OK,
        "users",
        &merge(page_context(&user), json!({ "users": rows })),
    )
}
