//! Tests against a running server
//!
//! Start the server first, then run with: cargo test -- --ignored

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let response = client()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_create_genre_and_view_it() {
    let client = client();
    let name = format!("Genre {}", uuid::Uuid::new_v4().simple());

    let response = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!("name={}", name.replace(' ', "+")))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .expect("No location header")
        .to_string();

    let page = client
        .get(format!("{}{}", BASE_URL, location))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(page.contains(&name));

    let response = client
        .post(format!("{}{}/delete", BASE_URL, location))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore]
async fn test_missing_book_is_not_found() {
    let response = client()
        .get(format!("{}/catalog/book/{}", BASE_URL, uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
