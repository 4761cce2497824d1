//! Helpers for driving the router in handler tests.

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, header};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::app_state::AppState;
use crate::config::MimicConfig;

/// The full application router plus a handle on its state.
#[derive(Debug)]
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Default configuration: one region (`ORD`), one pool, logical clock.
    pub fn new() -> Self {
        Self::with_config(&MimicConfig::default())
    }

    pub fn with_config(config: &MimicConfig) -> Self {
        let state = AppState::from_config(config);
        let router = super::build_app(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let body = body.map_or_else(String::new, |v| v.to_string());
        self.send_raw(method, uri, &body).await
    }

    #[allow(clippy::panic)]
    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> Response {
        let Ok(request) = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("invalid test request for {uri}");
        };
        let Ok(response) = self.router.clone().oneshot(request).await;
        response
    }
}

pub async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    String::from_utf8(bytes.to_vec()).unwrap_or_default()
}

#[allow(clippy::panic)]
pub async fn json_body(response: Response) -> Value {
    let text = text_body(response).await;
    let Ok(value) = serde_json::from_str(&text) else {
        panic!("response is not JSON: {text:?}");
    };
    value
}
