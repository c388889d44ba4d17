use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

static CHAT_HTML: &str = include_str!("../web/chat.html");

pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_HTML)
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub session_id: String,
}

// POST /bot/chat — the web test console. A blank session id mints a
// fresh session key that the client echoes back on later messages.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let session_id = payload
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let response = state.engine.handle_message(&session_id, &payload.message).await;

    Json(ChatResponse {
        success: true,
        response,
        session_id,
    })
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub session_id: Option<String>,
}

// POST /bot/reset — clearing an unknown session is a benign no-op, not
// an error.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetRequest>,
) -> Json<serde_json::Value> {
    let cleared = payload
        .session_id
        .map(|id| state.engine.reset_session(&id))
        .unwrap_or(false);

    if cleared {
        Json(serde_json::json!({ "success": true, "message": "Sessão reiniciada" }))
    } else {
        Json(serde_json::json!({ "success": false, "message": "Nenhuma sessão ativa" }))
    }
}

// GET /bot/test — smoke check used by deploys and the admin panel.
pub async fn test(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let test_response = state.engine.handle_message(&session_id, "Olá").await;
    state.engine.reset_session(&session_id);

    Json(serde_json::json!({
        "success": true,
        "message": "Bot está funcionando!",
        "test_response": test_response,
    }))
}
