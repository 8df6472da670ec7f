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
    async fn create_search_and_duplicate_phone() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let auth = bearer(&manager);
        let body = json!({ "full_name": "Pavel Orlov", "phone": "+375447770011", "is_vip": true });

        let response = app
            .clone()
            .oneshot(request("POST", "/api/clients", Some(&auth), Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["is_vip"], true);

        let response = app
            .clone()
            .oneshot(request("POST", "/api/clients", Some(&auth), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/clients?query=orlov", Some(&auth), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(request("GET", "/api/clients/vip", Some(&auth), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"][0]["full_name"], "Pavel Orlov");
    }

    #[tokio::test]
    #[serial]
    async fn masters_may_not_create_clients() {
        let (app, state) = make_test_app().await;
        let master = create_staff(&state, "viktor", Role::Master).await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/clients",
                Some(&bearer(&master)),
                Some(json!({ "full_name": "Pavel Orlov", "phone": "+375447770011" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn detail_includes_ticket_totals_and_delete_is_refused_while_active() {
        let (app, state) = make_test_app().await;
        let admin = create_staff(&state, "root", Role::Admin).await;
        let auth = bearer(&admin);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tickets",
                None,
                Some(json!({
                    "client_name": "Pavel Orlov",
                    "client_phone": "+375447770011",
                    "device_type": "Tablet",
                    "problem_description": "Battery swelling"
                })),
            ))
            .await
            .unwrap();
        let ticket = get_json_body(response).await["data"].clone();
        let client_id = ticket["client_id"].as_i64().unwrap();

        let uri = format!("/api/clients/{client_id}");
        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["phone"], "+375447770011");
        assert_eq!(json["data"]["stats"]["total_tickets"], 1);
        assert_eq!(json["data"]["stats"]["active_tickets"], 1);
        assert_eq!(json["data"]["stats"]["device_types"][0], "Tablet");

        let tickets_uri = format!("/api/clients/{client_id}/tickets");
        let response = app
            .clone()
            .oneshot(request("GET", &tickets_uri, Some(&auth), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"][0]["code"], ticket["code"]);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let archive_uri = format!("/api/tickets/{}/archive", ticket["code"].as_str().unwrap());
        app.clone()
            .oneshot(request("POST", &archive_uri, Some(&auth), None))
            .await
            .unwrap();

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
    async fn update_validates_and_reports_missing_client() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let auth = bearer(&manager);

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                "/api/clients/9999",
                Some(&auth),
                Some(json!({ "notes": "Prefers calls" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(request("PUT", "/api/clients/9999", Some(&auth), Some(json!({}))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn statistics_count_clients() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let auth = bearer(&manager);

        app.clone()
            .oneshot(request(
                "POST",
                "/api/clients",
                Some(&auth),
                Some(json!({ "full_name": "Pavel Orlov", "phone": "+375447770011", "is_vip": true })),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/clients/statistics", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["total_clients"], 1);
        assert_eq!(json["data"]["vip_clients"], 1);
        assert_eq!(json["data"]["new_clients_month"], 1);
    }
}
