use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::{
    error::Result,
    line::{signature, webhook},
    listener::Dispatcher,
    util::timestamp::local_now,
};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// `None` disables signature verification.
    pub channel_secret: Option<String>,
}

pub fn build_router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(callback))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    if let Some(secret) = &state.channel_secret {
        let provided = headers
            .get(signature::SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        signature::verify(secret, &body, provided)?;
    }

    tracing::debug!("Received webhook: {}", String::from_utf8_lossy(&body));
    let payload = webhook::parse_body(&body)?;

    state
        .dispatcher
        .handle_events(&payload.events, local_now())
        .await?;

    Ok(Json(json!({ "message": "OK" })))
}
