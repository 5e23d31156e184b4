//! Integration tests for Sous Chef.
//!
//! The tests talk HTTP to a running server and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the server
//! cargo run -p sous-chef-cli -- migrate
//! cargo run -p sous-chef-web
//!
//! # Run integration tests
//! cargo test -p sous-chef-integration-tests -- --ignored
//! ```
//!
//! Set `SOUS_CHEF_TEST_URL` to point at a server other than
//! `http://localhost:3000`.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("SOUS_CHEF_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A username no other test run has used (fits the 20-character limit).
#[must_use]
pub fn unique_username() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("t{}", id.get(..12).unwrap_or(&id))
}

/// Register a fresh user; the client is signed in afterwards.
///
/// # Panics
///
/// Panics if registration doesn't return 201.
#[allow(clippy::expect_used)]
pub async fn register(client: &Client) -> Value {
    let username = unique_username();
    let resp = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "first_name": "Test",
            "last_name": "Cook",
            "username": username,
            "email": format!("{username}@example.com"),
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to read registered user")
}
