//! End-to-end test: run the real server on an ephemeral port and drive the
//! RackConnect bulk node workflow over HTTP.

#![allow(clippy::panic)]

use std::net::SocketAddr;

use mimic::api;
use mimic::app_state::AppState;
use mimic::config::MimicConfig;
use serde_json::{Value, json};

async fn spawn_server() -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("could not bind an ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local address");
    };
    let app = api::build_app(AppState::from_config(&MimicConfig::default()));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

#[tokio::test]
async fn bulk_add_and_remove_over_http() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}/rackconnect/ORD/v3/e2e/load_balancer_pools");

    let Ok(response) = client
        .post(format!("http://{addr}/mimic/v1.1/tick"))
        .json(&json!({"amount": 50}))
        .send()
        .await
    else {
        panic!("tick request failed");
    };
    assert_eq!(response.status().as_u16(), 200);

    let Ok(response) = client.get(&base).send().await else {
        panic!("pool listing failed");
    };
    let Ok(Value::Array(pools)) = response.json::<Value>().await else {
        panic!("pool listing is not a JSON array");
    };
    let items: Vec<Value> = pools
        .iter()
        .filter_map(|p| p.get("id").cloned())
        .map(|id| json!({"cloud_server": {"id": "server-1"}, "load_balancer_pool": {"id": id}}))
        .collect();
    assert_eq!(items.len(), 1);

    let Ok(response) = client.post(format!("{base}/nodes")).json(&items).send().await else {
        panic!("bulk add failed");
    };
    assert_eq!(response.status().as_u16(), 200);
    let Ok(Value::Array(added)) = response.json::<Value>().await else {
        panic!("bulk add response is not a JSON array");
    };
    assert!(
        added
            .iter()
            .all(|n| n.get("created") == Some(&json!("1970-01-01T00:00:50Z")))
    );

    let Ok(response) = client.delete(format!("{base}/nodes")).json(&items).send().await else {
        panic!("bulk remove failed");
    };
    assert_eq!(response.status().as_u16(), 204);

    let Ok(response) = client.get(format!("{base}/nodes")).send().await else {
        panic!("node listing failed");
    };
    let Ok(nodes) = response.json::<Value>().await else {
        panic!("node listing is not JSON");
    };
    assert_eq!(nodes, json!([]));

    let Ok(response) = client.get(format!("{base}/X")).send().await else {
        panic!("pool lookup failed");
    };
    assert_eq!(response.status().as_u16(), 404);
    let Ok(text) = response.text().await else {
        panic!("404 body unreadable");
    };
    assert_eq!(text, "Load Balancer Pool X does not exist");
}
