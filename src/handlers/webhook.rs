use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::state::AppState;

const UNSUPPORTED_TYPE_REPLY: &str = "Desculpe, no momento só consigo processar mensagens \
                                      de texto. Por favor, digite sua pergunta! 😊";

#[derive(Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

// GET /webhook/whatsapp — Meta's subscription handshake: echo the
// challenge when the verify token matches.
pub async fn verify_webhook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Response {
    match (params.mode, params.verify_token) {
        (Some(mode), Some(token)) => {
            if mode == "subscribe" && token == state.config.whatsapp_verify_token {
                tracing::info!("webhook verified");
                params.challenge.unwrap_or_default().into_response()
            } else {
                (StatusCode::FORBIDDEN, "Forbidden").into_response()
            }
        }
        _ => (StatusCode::BAD_REQUEST, "Bad Request").into_response(),
    }
}

fn validate_signature(app_secret: &str, signature_header: &str, body: &[u8]) -> bool {
    let Some(received) = signature_header.strip_prefix("sha256=") else {
        return false;
    };

    let mut mac = match Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(body);

    let expected: String = mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();

    expected == received
}

// POST /webhook/whatsapp — always answers 200 so Meta does not retry;
// per-message failures are logged and answered in-channel instead.
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Signature check over the raw body (skip if no app secret — dev mode)
    if !state.config.whatsapp_app_secret.is_empty() {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !validate_signature(&state.config.whatsapp_app_secret, signature, &body) {
            tracing::warn!("invalid webhook signature");
            return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
        }
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable webhook payload");
            return ok_response();
        }
    };

    let entries = payload["entry"].as_array().cloned().unwrap_or_default();
    for entry in &entries {
        let changes = entry["changes"].as_array().cloned().unwrap_or_default();
        for change in &changes {
            let value = &change["value"];

            if let Some(messages) = value["messages"].as_array() {
                for message in messages {
                    handle_message(&state, message).await;
                }
            } else if let Some(statuses) = value["statuses"].as_array() {
                for status in statuses {
                    tracing::info!(
                        message_id = status["id"].as_str().unwrap_or(""),
                        recipient = status["recipient_id"].as_str().unwrap_or(""),
                        status = status["status"].as_str().unwrap_or(""),
                        "message status update"
                    );
                }
            }
        }
    }

    ok_response()
}

async fn handle_message(state: &Arc<AppState>, message: &serde_json::Value) {
    let Some(from) = message["from"].as_str() else {
        tracing::warn!("webhook message without sender, ignoring");
        return;
    };
    let message_id = message["id"].as_str().unwrap_or("");
    let message_type = message["type"].as_str().unwrap_or("");

    if !message_id.is_empty() {
        if let Err(e) = state.messaging.mark_as_read(message_id).await {
            tracing::warn!(error = %e, "failed to mark message as read");
        }
    }

    // Button taps carry their label and are answered like typed text.
    let text = match message_type {
        "text" => message["text"]["body"].as_str().map(|s| s.to_string()),
        "button" => message["button"]["text"].as_str().map(|s| s.to_string()),
        _ => None,
    };

    let Some(text) = text else {
        tracing::info!(from = %from, kind = message_type, "unsupported message type");
        if let Err(e) = state.messaging.send_message(from, UNSUPPORTED_TYPE_REPLY).await {
            tracing::error!(error = %e, "failed to send unsupported-type reply");
        }
        return;
    };

    tracing::info!(from = %from, body = %text, "incoming WhatsApp message");

    if let Err(e) = state.messaging.send_typing_indicator(from).await {
        tracing::debug!(error = %e, "failed to send typing indicator");
    }

    let reply = state.engine.handle_message(from, &text).await;

    if let Err(e) = state.messaging.send_message(from, &reply).await {
        tracing::error!(error = %e, from = %from, "failed to send reply");
    }
}

fn ok_response() -> Response {
    axum::Json(serde_json::json!({ "status": "ok" })).into_response()
}
