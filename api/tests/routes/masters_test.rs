#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_staff, get_json_body, make_test_app, request};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn available_lists_only_available_masters() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let busy = create_staff(&state, "boris", Role::Master).await;
        create_staff(&state, "viktor", Role::Master).await;
        let auth = bearer(&manager);

        let uri = format!("/api/masters/{}/availability", busy.id);
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&auth),
                Some(json!({ "is_available": false, "max_concurrent_tickets": 8 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["is_available"], false);
        assert_eq!(json["data"]["max_concurrent_tickets"], 8);
        assert_eq!(json["data"]["has_capacity"], false);

        let response = app
            .oneshot(request("GET", "/api/masters/available", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        let masters = json["data"].as_array().unwrap();
        assert_eq!(masters.len(), 1);
        assert_eq!(masters[0]["username"], "viktor");
        assert_eq!(masters[0]["has_capacity"], true);
    }

    #[tokio::test]
    #[serial]
    async fn availability_limits_are_validated() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let master = create_staff(&state, "viktor", Role::Master).await;

        let uri = format!("/api/masters/{}/availability", master.id);
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&bearer(&manager)),
                Some(json!({ "max_concurrent_tickets": 0 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/masters/{}/availability", manager.id);
        let response = app
            .oneshot(request(
                "PUT",
                &uri,
                Some(&bearer(&manager)),
                Some(json!({ "is_available": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn skills_are_replaced_by_admins_only() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let master = create_staff(&state, "viktor", Role::Master).await;
        let uri = format!("/api/masters/{}/skills", master.id);
        let body = json!({ "skills": [
            { "name": "Laptops", "level": 3 },
            { "name": "Soldering", "level": 5 }
        ]});

        let response = app
            .clone()
            .oneshot(request("PUT", &uri, Some(&bearer(&manager)), Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(request("PUT", &uri, Some(&bearer(&admin)), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&bearer(&master)), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        let skills = json["data"].as_array().unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0]["name"], "Soldering");
        assert_eq!(skills[0]["level"], 5);

        let response = app
            .oneshot(request(
                "PUT",
                &uri,
                Some(&bearer(&admin)),
                Some(json!({ "skills": [{ "name": "Phones", "level": 9 }] })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn workload_of_unknown_or_non_master_user() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let auth = bearer(&manager);

        let uri = format!("/api/masters/{}/workload", manager.id);
        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request("GET", "/api/masters/9999/workload", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
