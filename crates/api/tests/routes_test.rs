//! End-to-end route tests through the Axum router.

mod common;

use axum::Router;
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use common::{app, create, send};

struct Seeded {
    client: i64,
    teams: Vec<i64>,
    volunteer: i64,
    bed: i64,
    microwave: i64,
}

async fn seed(app: &Router) -> Seeded {
    let client = create(
        app,
        "/api/clients",
        json!({ "first_name": "Amina", "last_name": "Haddad", "city": "Halifax" }),
    )
    .await;

    let mut teams = Vec::new();
    for name in ["North Crew", "South Crew", "Pickup Crew"] {
        teams.push(create(app, "/api/teams", json!({ "name": name })).await);
    }

    let volunteer = create(
        app,
        "/api/volunteers",
        json!({ "first_name": "Jonas", "last_name": "Berg", "has_transportation": true }),
    )
    .await;

    let bed = create(
        app,
        "/api/inventory",
        json!({ "name": "Single bed frame", "category": "furniture", "quantity": 10 }),
    )
    .await;
    let microwave = create(
        app,
        "/api/inventory",
        json!({ "name": "Microwave", "category": "appliances", "quantity": 2 }),
    )
    .await;

    Seeded {
        client,
        teams,
        volunteer,
        bed,
        microwave,
    }
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_i64().expect("integer id"))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_client_routes() {
    let app = app().await;
    let id = create(
        &app,
        "/api/clients",
        json!({ "first_name": "Maria", "last_name": "Lopez", "email": "maria@example.org" }),
    )
    .await;
    create(
        &app,
        "/api/clients",
        json!({ "first_name": "Ben", "last_name": "Okafor" }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/clients?q=lopez&per_page=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["per_page"], 5);
    assert_eq!(body["data"][0]["email"], "maria@example.org");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/clients/{id}"),
        Some(json!({ "first_name": "Maria", "last_name": "Lopez", "city": "Truro" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Truro");
    assert_eq!(body["email"], Value::Null);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/api/clients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_create_request_workflow() {
    let app = app().await;
    let s = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/requests",
        Some(json!({
            "clientId": s.client,
            "teamIds": [s.teams[0], s.teams[0]],
            "volunteerId": s.volunteer,
            "status": "In Progress",
            "priority": "high",
            "description": "  Moving into a new apartment  ",
            "products": [
                { "inventoryItemId": s.bed, "requestedQuantity": 0 },
                { "inventoryItemId": s.microwave, "requestedQuantity": 3 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let request = &body["request"];
    assert_eq!(request["status"], "in_progress");
    assert_eq!(request["priority"], "high");
    assert_eq!(request["description"], "Moving into a new apartment");
    assert_eq!(request["team_id"], s.teams[0]);
    assert_eq!(ids(&request["team_ids"]), vec![s.teams[0], s.teams[0]]);
    assert_eq!(ids(&request["volunteer_ids"]), vec![s.volunteer]);
    assert_eq!(request["client"]["last_name"], "Haddad");

    let items = request["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"], 1);
    assert_eq!(items[0]["status"], "requested");
    assert_eq!(items[0]["item_name"], "Single bed frame");

    // Three microwaves against two on hand: saved, with a warning.
    let warnings = body["stock_warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["inventory_item_id"], s.microwave);
    assert_eq!(warnings[0]["available"], 2);
}

#[tokio::test]
async fn test_update_and_delete_request() {
    let app = app().await;
    let s = seed(&app).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/requests",
        Some(json!({
            "client_id": s.client,
            "team_ids": [s.teams[0], s.teams[1]],
            "volunteer_id": s.volunteer,
            "products": [{ "inventory_item_id": s.bed, "requested_quantity": 2 }]
        })),
    )
    .await;
    let id = body["request"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/requests/{id}"),
        Some(json!({
            "client_id": s.client,
            "team_ids": [s.teams[1], s.teams[2]],
            "volunteer_id": s.volunteer,
            "status": "scheduled",
            "products": [{ "inventory_item_id": s.microwave, "requested_quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let request = &body["request"];
    assert_eq!(request["status"], "scheduled");
    assert_eq!(ids(&request["team_ids"]), vec![s.teams[1], s.teams[2]]);
    assert_eq!(request["team_id"], s.teams[1]);
    assert_eq!(request["items"].as_array().unwrap().len(), 1);
    assert_eq!(request["items"][0]["inventory_item_id"], s.microwave);
    assert_eq!(ids(&request["volunteer_ids"]), vec![s.volunteer]);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/requests?status=scheduled&team_id={}", s.teams[2]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/requests/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/requests/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/requests/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The client has no requests left, so it can go.
    let (status, _) = send(&app, Method::DELETE, &format!("/api/clients/{}", s.client), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[rstest]
#[case::missing_client(|s: &Seeded| json!({ "team_ids": [s.teams[0]] }))]
#[case::unknown_status(|s: &Seeded| json!({ "client_id": s.client, "status": "lost" }))]
#[case::zero_team_id(|s: &Seeded| json!({ "client_id": s.client, "team_ids": [0] }))]
#[case::unknown_team(|s: &Seeded| json!({ "client_id": s.client, "team_ids": [9999] }))]
#[case::unknown_client(|_: &Seeded| json!({ "client_id": 9999 }))]
#[case::unknown_inventory_item(|s: &Seeded| json!({
    "client_id": s.client,
    "products": [{ "inventory_item_id": 9999, "requested_quantity": 1 }],
}))]
#[tokio::test]
async fn test_request_validation_errors(#[case] body: fn(&Seeded) -> Value) {
    let app = app().await;
    let s = seed(&app).await;
    let body = body(&s);

    let (status, response) = send(&app, Method::POST, "/api/requests", Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {response}");
    assert_eq!(response["error"], "validation_error");

    let (_, list) = send(&app, Method::GET, "/api/requests", None).await;
    assert_eq!(list["meta"]["total"], 0);
}

#[tokio::test]
async fn test_request_list_rejects_unknown_priority() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/requests?priority=whenever", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_sub_resources() {
    let app = app().await;
    let s = seed(&app).await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/requests",
        Some(json!({ "client_id": s.client })),
    )
    .await;
    let id = body["request"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/requests/{id}/teams"),
        Some(json!({ "teamIds": [s.teams[2], s.teams[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["team_ids"]), vec![s.teams[2], s.teams[0]]);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/requests/{id}/items"),
        Some(json!({ "inventory_item_id": s.bed, "requested_quantity": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/requests/{id}/items"),
        Some(json!({ "products": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, Method::GET, &format!("/api/requests/{id}/items"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_volunteer_assignment_routes() {
    let app = app().await;
    let s = seed(&app).await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/requests",
        Some(json!({ "client_id": s.client })),
    )
    .await;
    let id = body["request"]["id"].as_i64().unwrap();
    let uri = format!("/api/requests/{id}/volunteers");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "volunteer_id": s.volunteer, "scheduled_date": "2025-05-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["created"], true);
    let delivery = body["delivery"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "volunteer_id": s.volunteer })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/delivery-assignments/{delivery}"),
        Some(json!({ "status": "completed", "date": "2025-05-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["completed_date"], "2025-05-10");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/delivery-assignments/{delivery}"),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "business_rule_violation");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/delivery-assignments/{delivery}"),
        Some(json!({ "status": "lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{uri}/{}", s.volunteer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Completed delivery stays as history.
    let (_, body) = send(&app, Method::GET, &format!("/api/requests/{id}/assignments"), None).await;
    assert_eq!(body["assignments"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{uri}/{}", s.volunteer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_volunteer_availability_payloads() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/volunteers",
        Some(json!({
            "first_name": "Priya",
            "last_name": "Nair",
            "availability": ["sat", "monday"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_active"], true);
    assert_eq!(body["availability"], json!({ "days": ["monday", "saturday"] }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/volunteers",
        Some(json!({
            "first_name": "Lee",
            "last_name": "Walker",
            "availability": { "days": ["someday"] }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let skill = create(&app, "/api/skills", json!({ "name": "Driving" })).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/skills",
        Some(json!({ "name": "Driving" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (_, list) = send(&app, Method::GET, "/api/volunteers", None).await;
    let volunteer = list["data"][0]["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/volunteers/{volunteer}/skills"),
        Some(json!({ "ids": [skill] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["skill_ids"]), vec![skill]);

    let (_, body) = send(&app, Method::GET, &format!("/api/volunteers?skill_id={skill}"), None).await;
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn test_inventory_routes() {
    let app = app().await;
    let id = create(
        &app,
        "/api/inventory",
        json!({ "name": "Winter coat", "category": "clothing", "quantity": 3 }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, &format!("/api/inventory/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock_status"], "low_stock");
    assert_eq!(body["is_available"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/inventory/{id}/adjust"),
        Some(json!({ "delta": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 10);
    assert_eq!(body["stock_status"], "in_stock");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/inventory/{id}/adjust"),
        Some(json!({ "delta": -11 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "business_rule_violation");

    let (_, body) = send(&app, Method::GET, "/api/inventory?category=clothing&available=true", None).await;
    assert_eq!(body["meta"]["total"], 1);
}
