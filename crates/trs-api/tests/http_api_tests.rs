//! ---
//! trs_section: "05-networking-external-interfaces"
//! trs_subsection: "integration-tests"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "HTTP round-trip tests for the TRS API surface."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::sync::Arc;

use serde_json::Value;
use trs_api::{spawn_api_server, ApiServer, ApiState};
use trs_core::{HallGenerator, HallProfile};

fn test_state(seed: u64) -> Arc<ApiState> {
    Arc::new(ApiState::new(HallGenerator::new(
        HallProfile::default(),
        seed,
    )))
}

fn spawn_test_server(seed: u64) -> ApiServer {
    spawn_api_server(
        test_state(seed),
        "127.0.0.1:0".parse().expect("loopback addr"),
        None,
    )
    .expect("api server spawns")
}

#[tokio::test]
async fn state_endpoint_returns_the_full_snapshot_contract() {
    let server = spawn_test_server(101);
    let url = format!("http://{}/api/state", server.addr());

    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(body["site"], "HPC Hall 2");
    assert_eq!(body["racks"].as_array().unwrap().len(), 24);
    assert!(body["timestamp"].is_string());
    assert!(body["currentSetpoint"].is_number());
    assert!(body["fragileOrCriticalCount"].as_u64().unwrap() >= 4);
    assert!(body["criticalCount"].is_number());
    assert!(body["stressRack"]["id"].is_string());
    assert_eq!(body["allowedDeltaRange"]["max"], 2.0);

    let category = body["overallHeadroom"].as_str().unwrap();
    assert!(["Stable", "Tight", "Fragile", "Critical"].contains(&category));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn repeated_reads_are_bit_identical() {
    let server = spawn_test_server(102);
    let url = format!("http://{}/api/state", server.addr());

    let first = reqwest::get(&url).await.unwrap().text().await.unwrap();
    let second = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert_eq!(first, second);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn refresh_replaces_the_snapshot() {
    let server = spawn_test_server(103);
    let client = reqwest::Client::new();
    let state_url = format!("http://{}/api/state", server.addr());
    let refresh_url = format!("http://{}/api/refresh", server.addr());

    let before: Value = client.get(&state_url).send().await.unwrap().json().await.unwrap();
    let refreshed: Value = client
        .post(&refresh_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after: Value = client.get(&state_url).send().await.unwrap().json().await.unwrap();

    // The refresh response is the new current state.
    assert_eq!(refreshed, after);
    // Same grid identity, regenerated values.
    assert_eq!(
        before["racks"][0]["id"].as_str().unwrap(),
        after["racks"][0]["id"].as_str().unwrap()
    );
    assert_ne!(before["racks"], after["racks"]);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn simulate_projects_without_mutating_state() {
    let server = spawn_test_server(104);
    let client = reqwest::Client::new();
    let state_url = format!("http://{}/api/state", server.addr());
    let simulate_url = format!("http://{}/api/simulate", server.addr());

    let before = client.get(&state_url).send().await.unwrap().text().await.unwrap();
    let result: Value = client
        .post(&simulate_url)
        .json(&serde_json::json!({ "delta": 1.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let after = client.get(&state_url).send().await.unwrap().text().await.unwrap();

    assert_eq!(result["setpointDelta"], 1.0);
    assert_eq!(result["postRacks"].as_array().unwrap().len(), 24);
    assert!(result["topAffected"].as_array().unwrap().len() <= 3);
    assert!(result["failureFlags"]["inletSafeThresholdBreached"].is_boolean());
    assert!(result["postRacks"][0]["prevCategory"].is_string());
    assert!(result["postRacks"][0]["changed"].is_boolean());

    // Simulation is a pure read.
    assert_eq!(before, after);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn simulate_clamps_and_defaults_delta_at_the_boundary() {
    let server = spawn_test_server(105);
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/simulate", server.addr());

    let over: Value = client
        .post(&url)
        .json(&serde_json::json!({ "delta": 5.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(over["setpointDelta"], 2.0);

    let under: Value = client
        .post(&url)
        .json(&serde_json::json!({ "delta": -5.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(under["setpointDelta"], 0.0);

    // Missing delta defaults to a no-op projection.
    let defaulted: Value = client
        .post(&url)
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(defaulted["setpointDelta"], 0.0);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn simulate_rejects_non_numeric_delta() {
    let server = spawn_test_server(106);
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/simulate", server.addr());

    let response = client
        .post(&url)
        .json(&serde_json::json!({ "delta": "two" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let response = client
        .post(&url)
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn status_reports_daemon_liveness() {
    let server = spawn_test_server(107);
    let url = format!("http://{}/api/status", server.addr());

    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
    assert_eq!(body["site"], "HPC Hall 2");
    assert_eq!(body["rack_count"], 24);

    server.shutdown().await.unwrap();
}
