//! API integration tests

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use book_manager_server::{
    api,
    config::{AppConfig, DatabaseConfig},
    repository::Repository,
    services::Services,
    AppState,
};

struct TestServer {
    base_url: String,
    repository: Repository,
}

/// Serve the router on an ephemeral port, backed by a fresh in-memory database
async fn spawn_server() -> TestServer {
    let config = AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        ..AppConfig::default()
    };

    let pool = Repository::connect(&config.database)
        .await
        .expect("Failed to open database");
    let repository = Repository::new(pool);
    repository.migrate().await.expect("Failed to migrate");

    let state = AppState {
        services: Arc::new(Services::new(repository.clone())),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, api::create_router(state))
            .await
            .expect("Server failed");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        repository,
    }
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, client: &Client, body: Value) -> reqwest::Response {
        client
            .post(self.url("/api/books"))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[tokio::test]
async fn test_health_check() {
    let server = spawn_server().await;
    let client = Client::new();

    let response = client
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(server.url("/ready"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_crud_scenario() {
    let server = spawn_server().await;
    let client = Client::new();

    let before = Utc::now();
    let response = server
        .create(
            &client,
            json!({ "title": "Dune", "author": "Frank Herbert", "yearPublished": 1965 }),
        )
        .await;
    let after = Utc::now();
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("No Location header");

    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_i64().expect("No book ID");
    assert!(id > 0);
    assert_eq!(location, format!("/api/books/{}", id));
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["author"], "Frank Herbert");
    assert_eq!(created["yearPublished"], 1965);

    let date_added: DateTime<Utc> = created["dateAdded"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("Invalid dateAdded");
    assert!(date_added >= before && date_added <= after);

    // List contains exactly that record
    let books: Value = client
        .get(server.url("/api/books"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(books, json!([created.clone()]));

    // Round trip through the location
    let fetched: Value = client
        .get(server.url(&location))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(fetched, created);

    // Future year is rejected
    let response = client
        .put(server.url(&location))
        .json(&json!({ "title": "Dune", "author": "Frank Herbert", "yearPublished": 2099 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains(&current_year().to_string()));

    // Valid update keeps id and dateAdded
    let response = client
        .put(server.url(&location))
        .json(&json!({ "title": "Dune Messiah", "author": "Frank Herbert", "yearPublished": 1969 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["dateAdded"], created["dateAdded"]);
    assert_eq!(updated["title"], "Dune Messiah");
    assert_eq!(updated["yearPublished"], 1969);

    // Delete, then the list is empty and the book is gone
    let response = client
        .delete(server.url(&location))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.expect("No body").is_empty());

    let books: Value = client
        .get(server.url("/api/books"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(books, json!([]));

    let response = client
        .get(server.url(&location))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(server.url(&location))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_year_boundaries() {
    let server = spawn_server().await;
    let client = Client::new();
    let year = current_year();

    for (year_published, expected) in [
        (1000, StatusCode::CREATED),
        (999, StatusCode::BAD_REQUEST),
        (year, StatusCode::CREATED),
        (year + 1, StatusCode::BAD_REQUEST),
    ] {
        let response = server
            .create(
                &client,
                json!({ "title": "Boundary", "author": "Anon", "yearPublished": year_published }),
            )
            .await;
        assert_eq!(response.status(), expected, "year {}", year_published);
    }
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let server = spawn_server().await;
    let client = Client::new();

    let mut ids = Vec::new();
    for title in ["The Hobbit", "Solaris", "Wiedźmin"] {
        let created: Value = server
            .create(
                &client,
                json!({ "title": title, "author": "Someone", "yearPublished": 1960 }),
            )
            .await
            .json()
            .await
            .expect("Failed to parse response");
        ids.push(created["id"].as_i64().expect("No book ID"));
    }
    ids.reverse();

    let books: Vec<Value> = client
        .get(server.url("/api/books"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let listed: Vec<i64> = books.iter().filter_map(|b| b["id"].as_i64()).collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_invalid_shape_returns_field_errors() {
    let server = spawn_server().await;
    let client = Client::new();

    let response = server
        .create(&client, json!({ "title": "", "author": "   " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["details"]["title"].is_array());
    assert!(body["details"]["yearPublished"].is_array());

    let response = server
        .create(&client, json!({ "title": "Dune", "author": "   ", "yearPublished": 1965 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["details"]["author"].is_array());

    // Malformed JSON
    let response = client
        .post(server.url("/api/books"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_book_returns_not_found() {
    let server = spawn_server().await;
    let client = Client::new();

    let response = client
        .put(server.url("/api/books/99999"))
        .json(&json!({ "title": "Ghost", "author": "Nobody", "yearPublished": 2000 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Shape is checked before existence
    let response = client
        .put(server.url("/api/books/99999"))
        .json(&json!({ "title": "Ghost" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_returns_internal_error() {
    let server = spawn_server().await;
    let client = Client::new();

    server.repository.pool.close().await;

    let response = client
        .get(server.url("/api/books"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Database error");

    let response = client
        .get(server.url("/ready"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_id_returns_json_bad_request() {
    let server = spawn_server().await;
    let client = Client::new();

    for path in ["/api/books/abc", "/api/books/99999999999999999999"] {
        let response = client
            .get(server.url(path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);

        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["error"], "BadValue");
        assert!(body["message"].is_string());
    }

    let response = client
        .delete(server.url("/api/books/abc"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nul_in_title_is_accepted() {
    let server = spawn_server().await;
    let client = Client::new();

    let response = server
        .create(
            &client,
            json!({ "title": "\u{0}Dune", "author": "Frank", "yearPublished": 1965 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "\u{0}Dune");
}
