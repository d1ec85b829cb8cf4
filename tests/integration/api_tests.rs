//! API integration tests against a running server.
//!
//! Expects members 1001 and 1002 and at least one bookable equipment row.

use chrono::{Duration, NaiveDate};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3001/api";
const OWNER: i64 = 1001;
const FRIEND: i64 = 1002;

/// A one-hour slot far in the future, distinct per run
fn future_slot(offset_hours: i64) -> (String, String) {
    let base = NaiveDate::from_ymd_opt(2090, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid base date");
    let run = chrono::Local::now().timestamp() % 500_000;
    let start = base + Duration::hours(run * 10 + offset_hours);
    let end = start + Duration::hours(1);
    (
        start.format("%Y-%m-%dT%H:%M").to_string(),
        end.format("%Y-%m-%dT%H:%M").to_string(),
    )
}

async fn first_equipment(client: &Client) -> i64 {
    let body: Value = client
        .get(format!("{}/equipment-booking/equipment/list", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["data"][0]["id"].as_i64().expect("No bookable equipment")
}

async fn create_booking(client: &Client, equipment_id: i64, member: i64, slot: &(String, String)) -> reqwest::Response {
    client
        .post(format!("{}/equipment-booking/booking/create", BASE_URL))
        .json(&json!({
            "equipmentId": equipment_id,
            "memberAccount": member,
            "startTime": slot.0,
            "endTime": slot.1,
            "locationNote": "integration test"
        }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
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
async fn test_ready_check() {
    let client = Client::new();
    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_overlapping_booking_rejected() {
    let client = Client::new();
    let equipment_id = first_equipment(&client).await;
    let slot = future_slot(0);

    let response = create_booking(&client, equipment_id, OWNER, &slot).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    let booking_id = body["data"]["bookingId"].as_i64().expect("No booking id");

    let response = create_booking(&client, equipment_id, FRIEND, &slot).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .delete(format!(
            "{}/equipment-booking/booking/{}/member/{}",
            BASE_URL, booking_id, OWNER
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_past_booking_rejected() {
    let client = Client::new();
    let equipment_id = first_equipment(&client).await;
    let slot = ("2020-01-01T10:00".to_string(), "2020-01-01T11:00".to_string());

    let response = create_booking(&client, equipment_id, OWNER, &slot).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn test_share_and_train_flow() {
    let client = Client::new();
    let equipment_id = first_equipment(&client).await;
    let slot = future_slot(3);

    let body: Value = create_booking(&client, equipment_id, OWNER, &slot)
        .await
        .json()
        .await
        .expect("Failed to parse response");
    let booking_id = body["data"]["bookingId"].as_i64().expect("No booking id");

    // Share request, accepted by the owner
    let body: Value = client
        .post(format!("{}/equipment-booking/share-request/create", BASE_URL))
        .json(&json!({"bookingId": booking_id, "requesterAccount": FRIEND}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let request_id = body["data"]["requestId"].as_i64().expect("No request id");

    let response = client
        .post(format!("{}/equipment-booking/share-request/{}/handle", BASE_URL, request_id))
        .json(&json!({"bookingOwnerAccount": OWNER, "action": "accept"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/equipment-booking/member/{}/bookings", BASE_URL, FRIEND))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let shared = body["data"]
        .as_array()
        .expect("No booking list")
        .iter()
        .any(|b| b["id"] == booking_id && b["booking_type"] == "shared");
    assert!(shared);

    // Training session, confirmed then locked
    let body: Value = client
        .post(format!("{}/equipment-booking/booking/{}/training-records", BASE_URL, booking_id))
        .json(&json!({
            "records": [{"weight": "20kg", "repetitions": "12", "exercise_name": "bench"}],
            "fullyComplete": false,
            "memberAccount": OWNER
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let session_id = body["data"]["sessionId"].as_i64().expect("No session id");

    let response = client
        .post(format!(
            "{}/equipment-booking/booking/{}/session/{}/complete",
            BASE_URL, booking_id, session_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{}/equipment-booking/booking/{}", BASE_URL, booking_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["data"]["trainingSessions"][0]["status"], "completed");
    assert_eq!(body["data"]["shareRequests"][0]["status"], "accepted");

    // Clean up
    client
        .delete(format!(
            "{}/equipment-booking/booking/{}/member/{}",
            BASE_URL, booking_id, OWNER
        ))
        .send()
        .await
        .expect("Failed to send request");
}
