//! HTTP contract tests for the promotions API.

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, Local, NaiveDate};
use promotions_api::routes;
use serde_json::{json, Value};

fn test_server() -> TestServer {
    let state = routes::create_in_memory_app_state().unwrap();
    let app = routes::create_api_router().with_state(state);
    TestServer::new(app).unwrap()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn payload(name: &str, product_id: i64, start: NaiveDate, end: NaiveDate) -> Value {
    json!({
        "name": name,
        "promotion_type": "Percentage off",
        "value": 20,
        "product_id": product_id,
        "start_date": start.to_string(),
        "end_date": end.to_string(),
    })
}

async fn create(server: &TestServer, body: &Value) -> Value {
    let response = server.post("/promotions").json(body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_index_returns_service_descriptor() {
    let server = test_server();
    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["name"], "Promotions Service");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["paths"]["promotions"], "/promotions");
}

#[tokio::test]
async fn test_health_check() {
    let server = test_server();
    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"status": "OK"}));
}

#[tokio::test]
async fn test_create_promotion() {
    let server = test_server();
    let body = payload("Summer Sale", 42, today(), today() + Duration::days(30));

    let response = server.post("/promotions").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let created = response.json::<Value>();
    let id = created["id"].as_i64().expect("id must be assigned");
    assert_eq!(created["name"], "Summer Sale");
    assert_eq!(created["promotion_type"], "Percentage off");
    assert_eq!(created["value"], 20);
    assert_eq!(created["product_id"], 42);
    assert_eq!(created["start_date"], today().to_string());

    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header must be set")
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.ends_with(&format!("/promotions/{}", id)));
}

#[tokio::test]
async fn test_get_promotion_after_create() {
    let server = test_server();
    let created = create(
        &server,
        &payload("Summer Sale", 42, today(), today() + Duration::days(30)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = server.get(&format!("/promotions/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), created);
}

#[tokio::test]
async fn test_get_unknown_promotion_returns_404() {
    let server = test_server();
    let response = server.get("/promotions/99999").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_list_promotions_returns_array_and_counts() {
    let server = test_server();
    for name in ["A", "B", "C"] {
        create(
            &server,
            &payload(name, 1, today(), today() + Duration::days(5)),
        )
        .await;
    }

    let response = server.get("/promotions").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_filter_by_name() {
    let server = test_server();
    create(
        &server,
        &payload("Summer Sale", 1, today(), today() + Duration::days(5)),
    )
    .await;
    create(
        &server,
        &payload("Winter Sale", 2, today(), today() + Duration::days(5)),
    )
    .await;

    let response = server
        .get("/promotions")
        .add_query_param("name", "Summer Sale")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], "Summer Sale");
}

#[tokio::test]
async fn test_list_filter_by_product_id() {
    let server = test_server();
    create(
        &server,
        &payload("A", 7, today(), today() + Duration::days(5)),
    )
    .await;
    create(
        &server,
        &payload("B", 8, today(), today() + Duration::days(5)),
    )
    .await;

    let response = server
        .get("/promotions")
        .add_query_param("product_id", "7")
        .await;
    let body = response.json::<Value>();
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["product_id"], 7);

    // a non-integer product_id matches nothing rather than failing
    let response = server
        .get("/promotions")
        .add_query_param("product_id", "seven")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.json::<Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filter_by_promotion_type() {
    let server = test_server();
    let mut bogo = payload("A", 1, today(), today() + Duration::days(5));
    bogo["promotion_type"] = json!("BOGO");
    create(&server, &bogo).await;
    create(
        &server,
        &payload("B", 2, today(), today() + Duration::days(5)),
    )
    .await;

    let response = server
        .get("/promotions")
        .add_query_param("promotion_type", "BOGO")
        .await;
    let body = response.json::<Value>();
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["promotion_type"], "BOGO");

    // no match yields an empty list, not an error
    let response = server
        .get("/promotions")
        .add_query_param("promotion_type", "Unknown")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.json::<Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filter_by_id_found_and_not_found() {
    let server = test_server();
    let created = create(
        &server,
        &payload("A", 1, today(), today() + Duration::days(5)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = server
        .get("/promotions")
        .add_query_param("id", id.to_string())
        .await;
    let body = response.json::<Value>();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], id);

    let response = server.get("/promotions").add_query_param("id", "99999").await;
    assert!(response.json::<Value>().as_array().unwrap().is_empty());

    let response = server.get("/promotions").add_query_param("id", "abc").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.json::<Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_precedence_id_beats_name() {
    let server = test_server();
    let a = create(
        &server,
        &payload("Alpha", 1, today(), today() + Duration::days(5)),
    )
    .await;
    create(
        &server,
        &payload("Beta", 2, today(), today() + Duration::days(5)),
    )
    .await;
    let a_id = a["id"].as_i64().unwrap();

    // both filters supplied; the result is governed solely by `id`
    let response = server
        .get("/promotions")
        .add_query_param("id", a_id.to_string())
        .add_query_param("name", "Beta")
        .await;
    let body = response.json::<Value>();
    let matches = body.as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], "Alpha");
}

#[tokio::test]
async fn test_active_filter_returns_only_current_promotions() {
    let server = test_server();
    let a = create(
        &server,
        &payload(
            "A",
            1,
            today() - Duration::days(2),
            today() + Duration::days(2),
        ),
    )
    .await;
    let b = create(
        &server,
        &payload(
            "B",
            1,
            today() - Duration::days(10),
            today() - Duration::days(1),
        ),
    )
    .await;
    let c = create(
        &server,
        &payload(
            "C",
            1,
            today() + Duration::days(1),
            today() + Duration::days(10),
        ),
    )
    .await;

    let response = server
        .get("/promotions")
        .add_query_param("active", "true")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let active = response.json::<Value>();
    let active_ids: Vec<i64> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(active_ids, vec![a["id"].as_i64().unwrap()]);

    let response = server
        .get("/promotions")
        .add_query_param("active", "false")
        .await;
    let inactive = response.json::<Value>();
    let inactive_ids: Vec<i64> = inactive
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(
        inactive_ids,
        vec![b["id"].as_i64().unwrap(), c["id"].as_i64().unwrap()]
    );
}

#[tokio::test]
async fn test_update_promotion_changes_fields() {
    let server = test_server();
    let created = create(
        &server,
        &payload("Before", 1, today(), today() + Duration::days(5)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let mut body = payload("After", 9, today(), today() + Duration::days(9));
    body["value"] = json!(55);

    let response = server.put(&format!("/promotions/{}", id)).json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response.json::<Value>();
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "After");
    assert_eq!(updated["value"], 55);
    assert_eq!(updated["product_id"], 9);

    let fetched = server.get(&format!("/promotions/{}", id)).await;
    assert_eq!(fetched.json::<Value>(), updated);
}

#[tokio::test]
async fn test_update_unknown_promotion_returns_404() {
    let server = test_server();
    let body = payload("Ghost", 1, today(), today() + Duration::days(5));

    let response = server.put("/promotions/99999").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_id_mismatch_returns_400() {
    let server = test_server();
    let created = create(
        &server,
        &payload("A", 1, today(), today() + Duration::days(5)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let mut body = payload("A", 1, today(), today() + Duration::days(5));
    body["id"] = json!(id + 1);

    let response = server.put(&format!("/promotions/{}", id)).json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let error = response.json::<Value>();
    assert_eq!(error["message"], "ID in body must match resource path");
}

#[tokio::test]
async fn test_deactivate_sets_end_date_to_yesterday_and_excludes_from_active() {
    let server = test_server();
    let created = create(
        &server,
        &payload(
            "D",
            1,
            today() - Duration::days(5),
            today() + Duration::days(5),
        ),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let yesterday = (today() - Duration::days(1)).to_string();

    let response = server
        .put(&format!("/promotions/{}/deactivate", id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["end_date"], yesterday);

    let active = server
        .get("/promotions")
        .add_query_param("active", "true")
        .await;
    assert!(active.json::<Value>().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deactivate_is_idempotent() {
    let server = test_server();
    let created = create(
        &server,
        &payload(
            "D",
            1,
            today() - Duration::days(5),
            today() + Duration::days(5),
        ),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let yesterday = (today() - Duration::days(1)).to_string();

    let first = server.put(&format!("/promotions/{}/deactivate", id)).await;
    assert_eq!(first.json::<Value>()["end_date"], yesterday);

    let second = server.put(&format!("/promotions/{}/deactivate", id)).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json::<Value>()["end_date"], yesterday);
}

#[tokio::test]
async fn test_deactivate_never_extends_an_ended_promotion() {
    let server = test_server();
    let old_end = (today() - Duration::days(10)).to_string();
    let created = create(
        &server,
        &payload(
            "E",
            1,
            today() - Duration::days(20),
            today() - Duration::days(10),
        ),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = server.put(&format!("/promotions/{}/deactivate", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["end_date"], old_end);
}

#[tokio::test]
async fn test_deactivate_unknown_promotion_returns_404() {
    let server = test_server();
    let response = server.put("/promotions/99999/deactivate").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_promotion_happy_path() {
    let server = test_server();
    let created = create(
        &server,
        &payload("A", 1, today(), today() + Duration::days(5)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = server.delete(&format!("/promotions/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let fetched = server.get(&format!("/promotions/{}", id)).await;
    assert_eq!(fetched.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_promotion_returns_404() {
    let server = test_server();
    let response = server.delete("/promotions/99999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
