#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_staff, get_json_body, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header},
    };
    use db::models::user::{Model as UserModel, Role};
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    fn login_request(username: &str, password: &str) -> Request<AxumBody> {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(
                json!({ "username": username, "password": password }).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn login_returns_token_and_sets_cookie() {
        let (app, state) = make_test_app().await;
        create_staff(&state, "olga", Role::Manager).await;

        let response = app.oneshot(login_request("olga", "password123")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(cookie.starts_with("access_token="));
        assert!(cookie.contains("HttpOnly"));

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["username"], "olga");
        assert_eq!(json["data"]["role"], "manager");
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

        let stored = UserModel::get_by_username(state.db(), "olga").await.unwrap().unwrap();
        assert!(stored.last_login.is_some());
    }

    #[tokio::test]
    #[serial]
    async fn login_rejects_wrong_password_and_inactive_accounts() {
        let (app, state) = make_test_app().await;
        let user = create_staff(&state, "viktor", Role::Master).await;

        let response = app
            .clone()
            .oneshot(login_request("viktor", "wrong-password"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Invalid username or password");

        UserModel::set_active(state.db(), user.id, false).await.unwrap();
        let response = app.oneshot(login_request("viktor", "password123")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn profile_accepts_bearer_and_cookie() {
        let (app, state) = make_test_app().await;
        let user = create_staff(&state, "anna", Role::Director).await;

        let req = Request::builder()
            .uri("/api/auth/profile")
            .header(header::AUTHORIZATION, bearer(&user))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["username"], "anna");
        assert!(json["data"].get("password_hash").is_none());

        let token = bearer(&user).trim_start_matches("Bearer ").to_string();
        let req = Request::builder()
            .uri("/api/auth/profile")
            .header(header::COOKIE, format!("access_token={token}"))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn profile_without_token_is_unauthorized() {
        let (app, _) = make_test_app().await;

        let req = Request::builder()
            .uri("/api/auth/profile")
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);

        let req = Request::builder()
            .uri("/api/auth/profile")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn logout_expires_the_cookie() {
        let (app, _) = make_test_app().await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, "access_token=stale")
            .body(AxumBody::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(cookie.starts_with("access_token="));
        assert!(cookie.contains("Max-Age=0"));
    }
}
