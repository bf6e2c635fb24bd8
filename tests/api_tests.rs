#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use shop_ledger::api::create_app;
use shop_ledger::config::database::create_tables;
use shop_ledger::core::context::AppContext;
use shop_ledger::core::user::{Role, ensure_owner, register_user};

struct TestApp {
    app: Router,
    owner_id: i64,
    worker_id: i64,
}

async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    create_tables(&db).await.unwrap();

    let owner = ensure_owner(&db, "owner").await.unwrap();
    let worker = register_user(&db, "ravi", Role::Worker, Some("shop1".to_string()))
        .await
        .unwrap();

    TestApp {
        app: create_app(AppContext::new(db, owner.id, "shop1".to_string())),
        owner_id: owner.id,
        worker_id: worker.id,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let t = spawn_app().await;
    let (status, body) = send(&t.app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_fund_purchase_settlement_flow() {
    let t = spawn_app().await;
    let me = Some(t.worker_id);

    let (status, _) = send(
        &t.app,
        "POST",
        "/api/funds",
        me,
        Some(json!({ "amount": 1000.0, "givenBy": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, paid) = send(
        &t.app,
        "POST",
        "/api/purchases",
        me,
        Some(json!({ "itemName": "rice", "quantity": 4, "unitPrice": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(paid["totalAmount"], 400.0);

    let (_, fund) = send(&t.app, "GET", "/api/funds", me, None).await;
    assert_eq!(fund["currentRemaining"], 600.0);

    let (status, borrowed) = send(
        &t.app,
        "POST",
        "/api/purchases",
        me,
        Some(json!({
            "itemName": "cement",
            "quantity": 1,
            "unitPrice": 500,
            "paymentType": "borrow"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(borrowed["borrowAmount"], 500.0);

    let (status, refused) = send(
        &t.app,
        "POST",
        "/api/purchases",
        me,
        Some(json!({ "itemName": "rice", "quantity": 7, "unitPrice": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        refused["error"],
        "Insufficient funds. Available: 600.00, Required: 700.00"
    );

    let uri = format!("/api/purchases/{}/pay-borrow", borrowed["id"]);
    let (status, settled) = send(&t.app, "POST", &uri, me, Some(json!({ "amount": 500 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["paymentType"], "paid");
    assert_eq!(settled["borrowAmount"], 0.0);

    let (_, fund) = send(&t.app, "GET", "/api/funds", me, None).await;
    assert_eq!(fund["currentRemaining"], 100.0);
    assert_eq!(fund["totalGiven"], 1000.0);

    let (_, listed) = send(&t.app, "GET", "/api/purchases?limit=1", me, None).await;
    assert_eq!(listed["totalCount"], 2);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_caller_is_rejected() {
    let t = spawn_app().await;
    let (status, body) = send(&t.app, "GET", "/api/funds", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_expense_receipt_and_delete() {
    let t = spawn_app().await;
    let me = Some(t.worker_id);
    send(&t.app, "POST", "/api/funds", me, Some(json!({ "amount": 300 }))).await;

    let (status, receipt) = send(
        &t.app,
        "POST",
        "/api/worker-expense",
        me,
        Some(json!({ "title": "Tea", "amount": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["remainingFund"], 255.0);
    assert_eq!(receipt["totalRemaining"], 255.0);

    let uri = format!("/api/worker-expense/{}", receipt["expense"]["id"]);
    let (status, _) = send(&t.app, "DELETE", &uri, me, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, fund) = send(&t.app, "GET", "/api/funds", me, None).await;
    assert_eq!(fund["currentRemaining"], 300.0);
}

#[tokio::test]
async fn test_sale_stock_and_settlement() {
    let t = spawn_app().await;
    let me = Some(t.worker_id);

    let (_, item) = send(
        &t.app,
        "POST",
        "/api/items",
        me,
        Some(json!({ "name": "sugar" })),
    )
    .await;
    assert_eq!(item["unit"], "kg");

    let (status, body) = send(
        &t.app,
        "POST",
        "/api/sales",
        me,
        Some(json!({ "itemId": item["id"], "quantity": 1, "unitPrice": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Insufficient stock"));

    send(&t.app, "POST", "/api/funds", me, Some(json!({ "amount": 500 }))).await;
    send(
        &t.app,
        "POST",
        "/api/purchases",
        me,
        Some(json!({ "itemId": item["id"], "quantity": 5, "unitPrice": 30 })),
    )
    .await;

    let (status, sale) = send(
        &t.app,
        "POST",
        "/api/sales",
        me,
        Some(json!({
            "itemId": item["id"],
            "quantity": 2,
            "unitPrice": 40,
            "paymentType": "borrow"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/sales/{}/pay-borrow", sale["id"]);
    let (status, settled) = send(&t.app, "POST", &uri, me, Some(json!({ "amount": 80 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["paymentType"], "paid");

    let (_, fund) = send(&t.app, "GET", "/api/funds", me, None).await;
    assert_eq!(fund["currentRemaining"], 350.0);
}

#[tokio::test]
async fn test_admin_endpoints() {
    let t = spawn_app().await;
    let admin = Some(t.owner_id);

    let (status, _) = send(&t.app, "GET", "/api/workers", Some(t.worker_id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, added) = send(
        &t.app,
        "POST",
        "/api/workers",
        admin,
        Some(json!({ "name": "Meena", "phone": "98450", "salary": 9000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["name"], "meena");
    assert_eq!(added["shopId"], "shop1");

    let (status, body) = send(
        &t.app,
        "POST",
        "/api/workers",
        admin,
        Some(json!({ "name": "meena" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Worker name already exists");

    let (status, day) = send(
        &t.app,
        "POST",
        "/api/attendance",
        admin,
        Some(json!({ "workerId": added["id"], "date": "2024-03-04", "status": "present" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/attendance?workerId={}&year=2024&month=3", added["id"]);
    let (status, records) = send(&t.app, "GET", &uri, admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records.as_array().unwrap().len(), 1);

    let (status, summary) = send(&t.app, "GET", "/api/reports/shops/shop1", admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["currentRemaining"], 0.0);

    let day_uri = format!("/api/attendance/{}", day["id"]);
    let (status, corrected) = send(
        &t.app,
        "PUT",
        &day_uri,
        admin,
        Some(json!({ "status": "absent", "notes": "sick" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(corrected["status"], "absent");

    let uri = format!("/api/workers/{}", added["id"]);
    let (status, detail) = send(&t.app, "GET", &uri, admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "meena");
    assert_eq!(detail["attendances"][0]["notes"], "sick");

    let (status, _) = send(&t.app, "DELETE", &day_uri, Some(t.worker_id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&t.app, "DELETE", &day_uri, admin, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, detail) = send(&t.app, "GET", &uri, admin, None).await;
    assert_eq!(detail["attendances"].as_array().unwrap().len(), 0);

    let (status, _) = send(&t.app, "DELETE", &uri, admin, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&t.app, "GET", &uri, admin, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_second_admin_conflicts() {
    let t = spawn_app().await;
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "boss", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Only one admin account is allowed");

    let (status, created) = send(
        &t.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Asha", "shopId": "shop2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "worker");
}
