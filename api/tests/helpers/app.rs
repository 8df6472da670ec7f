use api::{app, auth::generate_jwt};
use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use db::models::user::{Model as UserModel, NewUser, Role};
use db::test_utils::setup_test_db;
use serde_json::Value;
use util::{state::AppState, test_helpers::init_test_env};

/// Fresh in-memory database behind the full router (policy included).
pub async fn make_test_app() -> (Router, AppState) {
    init_test_env();
    let db = setup_test_db().await;
    let state = AppState::new(db);
    (app(state.clone()), state)
}

pub async fn create_staff(state: &AppState, username: &str, role: Role) -> UserModel {
    UserModel::create(
        state.db(),
        NewUser {
            username: username.to_string(),
            email: format!("{username}@service-center.test"),
            password: "password123".to_string(),
            full_name: format!("{username} test"),
            phone: None,
            role,
            specialization: None,
        },
    )
    .await
    .expect("Failed to create staff user")
}

/// `Authorization` header value for the given user.
pub fn bearer(user: &UserModel) -> String {
    let (token, _) = generate_jwt(user.id, &user.username, user.role).expect("token");
    format!("Bearer {token}")
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Builds a request with an optional `Authorization` header and JSON body.
pub fn request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
