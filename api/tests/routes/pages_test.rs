#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_staff, make_test_app, request};
    use axum::http::{StatusCode, header};
    use db::models::user::Role;
    use serial_test::serial;
    use tower::ServiceExt;

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn anonymous_dashboard_redirects_to_login() {
        let (app, _) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(request("GET", "/dashboard", None, None))
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let response = app
            .oneshot(request("GET", "/login", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("action=\"/login\""));
    }

    #[tokio::test]
    #[serial]
    async fn staff_see_dashboard_but_masters_not_users_page() {
        let (app, state) = make_test_app().await;
        let master = create_staff(&state, "viktor", Role::Master).await;
        let auth = bearer(&master);

        let response = app
            .clone()
            .oneshot(request("GET", "/dashboard", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("viktor"));

        let response = app
            .oneshot(request("GET", "/dashboard/users", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
