//! Repository and HTTP tests against a throwaway PostgreSQL container.
//!
//! Each test starts its own container, so these need Docker: `cargo test -- --ignored`.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{TimeZone, Utc};
use common::{send, BODY_LIMIT};
use orders_api::model::{ItemPatch, NewItem, NewOrder, NewUser, OrderPatch, UserPatch};
use orders_api::{app, ensure_database_exists, ensure_tables, AppState, PgRepository, Repository};
use serde_json::json;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;

/// Keeps the container alive for as long as the repository is used.
struct TestDb {
    _container: ContainerAsync<Postgres>,
    repo: PgRepository,
}

async fn database() -> TestDb {
    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container");
    let host = container.get_host().await.expect("Failed to get container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get PostgreSQL port");

    // Same startup path as the binary: the target database does not exist yet.
    let url = format!("postgres://postgres:postgres@{}:{}/?dbname=orders_test", host, port);
    ensure_database_exists(&url).await.expect("create database");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    ensure_tables(&pool).await.expect("create tables");

    TestDb {
        _container: container,
        repo: PgRepository::new(pool),
    }
}

fn item(code: &str, quantity: u32) -> NewItem {
    NewItem {
        item_code: code.into(),
        description: format!("{} description", code),
        quantity,
    }
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn user_round_trip_and_partial_update() {
    let db = database().await;
    let repo = &db.repo;
    let email = "ana@example.com".to_string();
    let created = repo
        .create_user(&NewUser {
            username: "ana".into(),
            email: email.clone(),
        })
        .await
        .unwrap();
    let fetched = repo.get_user(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let patch = UserPatch {
        username: Some(String::new()),
        email: None,
    };
    assert_eq!(repo.update_user(created.id, &patch).await.unwrap(), 1);
    let fetched = repo.get_user(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.username, "");
    assert_eq!(fetched.email, email);

    assert_eq!(repo.delete_user(created.id).await.unwrap(), 1);
    assert!(repo.get_user(created.id).await.unwrap().is_none());
    assert_eq!(repo.delete_user(created.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn email_filter_matches_substrings_literally() {
    let db = database().await;
    let repo = &db.repo;
    let marker = "mail.test";
    for local in ["a_b", "axb", "zzz"] {
        repo.create_user(&NewUser {
            username: local.into(),
            email: format!("{}@{}", local, marker),
        })
        .await
        .unwrap();
    }

    let all = repo.list_users(Some(marker)).await.unwrap();
    assert_eq!(all.len(), 3);

    let underscore = repo.list_users(Some("a_b@")).await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].username, "a_b");

    let upper = repo.list_users(Some(&marker.to_uppercase())).await.unwrap();
    assert!(upper.is_empty());
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn order_lifecycle() {
    let db = database().await;
    let repo = &db.repo;
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
    let customer = "Citra".to_string();
    let order = repo
        .create_order(&NewOrder {
            customer_name: customer.clone(),
            ordered_at: Some(at),
            items: vec![item("A1", 2), item("B2", 5)],
        })
        .await
        .unwrap();
    assert_eq!(order.ordered_at, at);
    assert_eq!(order.items.len(), 2);

    assert_eq!(repo.list_orders().await.unwrap(), vec![order.clone()]);

    let patch = OrderPatch {
        customer_name: Some(format!("{} renamed", customer)),
        ordered_at: None,
        items: Vec::new(),
    };
    assert_eq!(repo.update_order(order.order_id, &patch).await.unwrap(), 1);
    let zero = ItemPatch {
        line_item_id: Some(order.items[0].item_id),
        quantity: Some(0),
        ..Default::default()
    };
    assert_eq!(repo.update_item(order.items[0].item_id, &zero).await.unwrap(), 1);

    let fetched = repo.get_order(order.order_id).await.unwrap().unwrap();
    assert_eq!(fetched.customer_name, format!("{} renamed", customer));
    assert_eq!(fetched.ordered_at, at);
    assert_eq!(fetched.items[0].quantity, 0);
    assert_eq!(fetched.items[1], order.items[1]);

    assert_eq!(repo.delete_order(order.order_id).await.unwrap(), 1);
    assert!(repo.get_order(order.order_id).await.unwrap().is_none());
    assert!(repo.items_for_order(order.order_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn ping_succeeds() {
    let db = database().await;
    let repo = &db.repo;
    repo.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn deleting_an_order_over_http_removes_its_items() {
    let db = database().await;
    let app = app(AppState::new(db.repo.clone()), BODY_LIMIT);
    let (status, order) = send(
        &app,
        Method::POST,
        "/api/v1/orders",
        Some(json!({
            "customerName": "Dewi",
            "items": [
                {"itemCode": "A1", "description": "pen", "quantity": 3},
                {"itemCode": "B2", "description": "ink", "quantity": 1}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["orderId"].as_i64().unwrap();
    assert_eq!(db.repo.items_for_order(order_id).await.unwrap().len(), 2);

    let uri = format!("/api/v1/orders/{}", order_id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "order and related items deleted");

    assert!(db.repo.items_for_order(order_id).await.unwrap().is_empty());
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
