mod common;

use common::TestApp;
use portfolio_service::services::MockMailer;
use reqwest::Client;
use serde_json::json;

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn submission_with_short_name_is_rejected_and_not_persisted() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "J",
            "email": "john.doe@example.com",
            "message": "This is a long enough message."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Validation error");
    assert!(body["details"]["name"].is_array());

    let listing: Vec<serde_json::Value> = client
        .get(format!("{}/api/contact", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(listing.is_empty());
}

#[tokio::test]
async fn submission_with_malformed_email_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "invalid-email",
            "message": "This is a long enough message."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn submission_with_dotless_email_domain_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john@localhost",
            "message": "This is a long enough message."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn submission_with_short_message_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "message": "Short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["details"]["message"].is_array());
}

#[tokio::test]
async fn submission_with_multiple_violations_reports_every_field() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "J",
            "email": "invalid-email",
            "message": "Short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["message"].is_array());
}

#[tokio::test]
async fn malformed_json_body_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

// =============================================================================
// Submission pipeline
// =============================================================================

#[tokio::test]
async fn well_formed_submission_is_persisted_and_acknowledged() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "message": "This is a test message from automated testing."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    let id = body["id"].as_str().expect("Missing id").to_string();
    assert!(!id.is_empty());

    let listing: Vec<serde_json::Value> = client
        .get(format!("{}/api/contact", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["id"], id.as_str());
    assert_eq!(listing[0]["name"], "John Doe");
    assert_eq!(listing[0]["email"], "john.doe@example.com");
    assert_eq!(
        listing[0]["message"],
        "This is a test message from automated testing."
    );
    assert_eq!(listing[0]["status"], "new");
}

#[tokio::test]
async fn identical_submissions_produce_distinct_records() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let payload = json!({
        "name": "John Doe",
        "email": "john.doe@example.com",
        "message": "This is a test message from automated testing."
    });

    let mut ids = Vec::new();
    for _ in 0..2 {
        let body: serde_json::Value = client
            .post(format!("{}/api/contact", app.address))
            .json(&payload)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");
        ids.push(body["id"].as_str().expect("Missing id").to_string());
    }

    assert_ne!(ids[0], ids[1]);

    let listing: Vec<serde_json::Value> = client
        .get(format!("{}/api/contact", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listing.len(), 2);
}

#[tokio::test]
async fn listing_returns_messages_newest_first() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    for message in ["Message A, long enough.", "Message B, long enough.", "Message C, long enough."] {
        let response = client
            .post(format!("{}/api/contact", app.address))
            .json(&json!({
                "name": "John Doe",
                "email": "john.doe@example.com",
                "message": message
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
    }

    let listing: Vec<serde_json::Value> = client
        .get(format!("{}/api/contact", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    let messages: Vec<&str> = listing
        .iter()
        .map(|m| m["message"].as_str().expect("Missing message"))
        .collect();
    assert_eq!(
        messages,
        vec![
            "Message C, long enough.",
            "Message B, long enough.",
            "Message A, long enough."
        ]
    );
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/contact", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let listing: Vec<serde_json::Value> = response.json().await.expect("Failed to parse response");
    assert!(listing.is_empty());
}

// =============================================================================
// Notification decoupling
// =============================================================================

#[tokio::test]
async fn notification_is_attempted_after_submission() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "message": "This is a test message from automated testing."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    // The attempt runs detached from the response, so give it a moment.
    for _ in 0..50 {
        if app.mailer.send_count() > 0 {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }
    assert_eq!(app.mailer.send_count(), 1);
}

#[tokio::test]
async fn failing_mailer_does_not_affect_submission_or_persistence() {
    let app = TestApp::spawn_with_mailer(MockMailer::failing()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/contact", app.address))
        .json(&json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "message": "This is a test message from automated testing."
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);

    let listing: Vec<serde_json::Value> = client
        .get(format!("{}/api/contact", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["id"], body["id"]);
}
