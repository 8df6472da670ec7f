#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_staff, get_json_body, make_test_app, request};
    use axum::{Router, http::StatusCode};
    use db::models::user::{Model as UserModel, Role};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    async fn intake(app: &Router, device: &str) -> Value {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tickets",
                None,
                Some(json!({
                    "client_name": "Irina Sokol",
                    "client_phone": "+375291112233",
                    "device_type": device,
                    "brand": "Lenovo",
                    "problem_description": "Does not power on",
                    "priority": "high"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        get_json_body(response).await["data"].clone()
    }

    #[tokio::test]
    #[serial]
    async fn anonymous_intake_and_public_status_lookup() {
        let (app, _) = make_test_app().await;

        let ticket = intake(&app, "Laptop").await;
        let code = ticket["code"].as_str().unwrap().to_string();
        assert!(code.starts_with("RQ") && code.len() == 8);
        assert_eq!(ticket["status"], "accepted");
        assert_eq!(ticket["status_label"], "Accepted");
        assert_eq!(ticket["priority"], "high");
        assert!(ticket["created_by_id"].is_null());

        let uri = format!("/api/tickets/{}/status", code.to_lowercase());
        let response = app.oneshot(request("GET", &uri, None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["code"], code);
        assert_eq!(json["data"]["device"], "Laptop Lenovo");
        assert_eq!(json["data"]["status_label"], "Accepted");
        assert!(json["data"].get("client_id").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn anonymous_intake_requires_contact_details() {
        let (app, _) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/tickets",
                None,
                Some(json!({ "client_id": 1, "device_type": "Phone", "problem_description": "Cracked screen" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(request(
                "POST",
                "/api/tickets",
                None,
                Some(json!({
                    "client_name": "Irina Sokol",
                    "client_phone": "+375291112233",
                    "device_type": "Phone",
                    "problem_description": "Cracked screen",
                    "priority": "whenever"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_code_is_not_found() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(request("GET", "/api/tickets/RQ000000/status", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn ticket_list_requires_staff_and_hides_archived() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let auth = bearer(&manager);

        let first = intake(&app, "Laptop").await;
        intake(&app, "Phone").await;

        let response = app
            .clone()
            .oneshot(request("GET", "/api/tickets", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let uri = format!("/api/tickets/{}/archive", first["code"].as_str().unwrap());
        let response = app
            .clone()
            .oneshot(request("POST", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_json_body(response).await["data"]["is_archived"], true);

        let response = app
            .clone()
            .oneshot(request("GET", "/api/tickets", Some(&auth), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["tickets"][0]["device_type"], "Phone");

        let response = app
            .oneshot(request(
                "GET",
                "/api/tickets?include_archived=true",
                Some(&auth),
                None,
            ))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(json["data"]["page"], 1);
        assert_eq!(json["data"]["per_page"], 20);
    }

    #[tokio::test]
    #[serial]
    async fn list_rejects_bad_filters() {
        let (app, state) = make_test_app().await;
        let master = create_staff(&state, "viktor", Role::Master).await;
        let auth = bearer(&master);

        for uri in ["/api/tickets?status=lost", "/api/tickets?per_page=500"] {
            let response = app
                .clone()
                .oneshot(request("GET", uri, Some(&auth), None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    #[serial]
    async fn masters_cannot_assign() {
        let (app, state) = make_test_app().await;
        let master = create_staff(&state, "viktor", Role::Master).await;
        let ticket = intake(&app, "Laptop").await;

        let uri = format!("/api/tickets/{}/assign-master", ticket["code"].as_str().unwrap());
        let response = app
            .oneshot(request(
                "POST",
                &uri,
                Some(&bearer(&master)),
                Some(json!({ "master_id": master.id })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn assignment_workflow_end_to_end() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let master = create_staff(&state, "viktor", Role::Master).await;
        let auth = bearer(&manager);

        let ticket = intake(&app, "Laptop").await;
        let code = ticket["code"].as_str().unwrap().to_string();

        // assign
        let uri = format!("/api/tickets/{code}/assign-master");
        let response = app
            .clone()
            .oneshot(request("POST", &uri, Some(&auth), Some(json!({ "master_id": master.id }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["assigned_technician_id"], master.id);
        assert_eq!(json["data"]["assigned_by_id"], manager.id);

        let stored = UserModel::get_by_id(state.db(), master.id).await.unwrap().unwrap();
        assert_eq!(stored.active_ticket_count, 1);

        // the master works the ticket
        let uri = format!("/api/tickets/{code}/status");
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&bearer(&master)),
                Some(json!({ "status": "in_repair", "comment": "Replacing the charging port" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_json_body(response).await["data"]["status_label"], "In Repair");

        let uri = format!("/api/masters/{}/workload", master.id);
        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["active_tickets"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"]["technician"]["active_ticket_count"], 1);
        assert_eq!(json["data"]["stats_30d"]["assigned"], 1);

        let uri = format!("/api/tickets/{code}/status");
        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&auth),
                Some(json!({ "status": "ready_for_pickup" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let stored = UserModel::get_by_id(state.db(), master.id).await.unwrap().unwrap();
        assert_eq!(stored.active_ticket_count, 0);

        // history: created, in repair, ready for pickup
        let uri = format!("/api/tickets/{code}/history");
        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        let entries = json["data"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0]["old_status"].is_null());
        assert_eq!(entries[0]["new_status"], "accepted");
        assert_eq!(entries[1]["comment"], "Replacing the charging port");
        assert_eq!(entries[1]["changed_by"], master.id);
        assert_eq!(entries[2]["old_status"], "in_repair");

        // unassign twice: the second time there is nobody to remove
        let uri = format!("/api/tickets/{code}/assign-master?reason=handover");
        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(get_json_body(response).await["data"]["assigned_technician_id"].is_null());

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let uri = format!("/api/tickets/{code}/assignments");
        let response = app
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        let ledger = json["data"].as_array().unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0]["reason"], "handover");
        assert!(!ledger[0]["unassigned_at"].is_null());
    }

    #[tokio::test]
    #[serial]
    async fn ticket_detail_and_field_update() {
        let (app, state) = make_test_app().await;
        let manager = create_staff(&state, "olga", Role::Manager).await;
        let auth = bearer(&manager);

        let ticket = intake(&app, "Laptop").await;
        let code = ticket["code"].as_str().unwrap().to_string();
        let uri = format!("/api/tickets/{code}");

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(&auth),
                Some(json!({ "final_cost": 120.5, "notes": "Board repaired" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["final_cost"], 120.5);
        assert_eq!(json["data"]["status"], "accepted");

        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["client"]["full_name"], "Irina Sokol");
        assert!(json["data"]["technician"].is_null());
        assert_eq!(json["data"]["notes"], "Board repaired");

        let response = app
            .oneshot(request(
                "PUT",
                &uri,
                Some(&auth),
                Some(json!({ "estimated_cost": -5.0 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
