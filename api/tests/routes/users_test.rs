#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_staff, get_json_body, make_test_app, request};
    use axum::http::StatusCode;
    use db::models::user::{Model as UserModel, Role};
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn admin_creates_user_and_duplicates_conflict() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let auth = bearer(&admin);
        let body = json!({
            "username": "petrov",
            "email": "petrov@service-center.test",
            "password": "s3cret-pass",
            "full_name": "Ivan Petrov",
            "role": "master",
            "specialization": "Laptops"
        });

        let response = app
            .clone()
            .oneshot(request("POST", "/api/users", Some(&auth), Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["role"], "master");
        assert!(json["data"].get("password_hash").is_none());

        let response = app
            .clone()
            .oneshot(request("POST", "/api/users", Some(&auth), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(request(
                "POST",
                "/api/users",
                Some(&auth),
                Some(json!({
                    "username": "sidorov",
                    "email": "sidorov@service-center.test",
                    "password": "s3cret-pass",
                    "full_name": "Oleg Sidorov",
                    "role": "owner"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn managers_cannot_reach_user_management() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;

        let response = app
            .oneshot(request("GET", "/api/users", Some(&bearer(&manager)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn list_filters_by_role() {
        let (app, state) = make_test_app().await;
        let director = create_staff(&state, "anna", Role::Director).await;
        create_staff(&state, "viktor", Role::Master).await;
        create_staff(&state, "boris", Role::Master).await;

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/users?role=master",
                Some(&bearer(&director)),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let response = app
            .oneshot(request(
                "GET",
                "/api/users/statistics",
                Some(&bearer(&director)),
                None,
            ))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["total_users"], 3);
        assert_eq!(json["data"]["by_role"]["master"], 2);
    }

    #[tokio::test]
    #[serial]
    async fn self_delete_and_self_deactivate_are_forbidden() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let auth = bearer(&admin);

        let uri = format!("/api/users/{}", admin.id);
        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let uri = format!("/api/users/{}/deactivate", admin.id);
        let response = app
            .oneshot(request("POST", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn last_active_administrator_is_protected() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let director = create_staff(&state, "anna", Role::Director).await;

        // two administrators: the director may be deactivated
        let uri = format!("/api/users/{}/deactivate", director.id);
        let response = app
            .clone()
            .oneshot(request("POST", &uri, Some(&bearer(&admin)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // a token issued before deactivation is still honoured until it expires
        let uri = format!("/api/users/{}", admin.id);
        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&bearer(&director)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&bearer(&director)),
                Some(json!({ "role": "manager" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let stored = UserModel::get_by_id(state.db(), admin.id).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert!(stored.is_active);

        let uri = format!("/api/users/{}/activate", director.id);
        let response = app
            .oneshot(request("POST", &uri, Some(&bearer(&admin)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_json_body(response).await["data"]["is_active"], true);
    }

    #[tokio::test]
    #[serial]
    async fn update_and_delete_regular_user() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let master = create_staff(&state, "viktor", Role::Master).await;
        let auth = bearer(&admin);
        let uri = format!("/api/users/{}", master.id);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&auth),
                Some(json!({ "full_name": "Viktor Lebedev", "specialization": "Phones" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["full_name"], "Viktor Lebedev");
        assert_eq!(json["data"]["specialization"], "Phones");

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&auth),
                Some(json!({ "email": "root@service-center.test" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn technician_with_assignment_history_cannot_be_deleted() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let first = create_staff(&state, "viktor", Role::Master).await;
        let second = create_staff(&state, "oleg", Role::Master).await;
        let auth = bearer(&admin);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tickets",
                None,
                Some(json!({
                    "client_name": "Irina Sokol",
                    "client_phone": "+375291112233",
                    "device_type": "Laptop",
                    "problem_description": "Does not power on"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let code = get_json_body(response).await["data"]["code"]
            .as_str()
            .unwrap()
            .to_string();

        let assign_uri = format!("/api/tickets/{code}/assign-master");
        for master in [&first, &second] {
            let response = app
                .clone()
                .oneshot(request(
                    "POST",
                    &assign_uri,
                    Some(&auth),
                    Some(json!({ "master_id": master.id })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/users/{}", second.id), Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/users/{}", first.id), Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(request(
                "GET",
                &format!("/api/tickets/{code}/assignments"),
                Some(&auth),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        let entries = json["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["technician_id"], second.id);

        let ticket = db::models::repair_ticket::Model::find_by_code(state.db(), &code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ticket.assigned_technician_id, Some(second.id));
    }
}
