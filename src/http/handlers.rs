//! HTTP handlers for the chat endpoints.
//!
//! Endpoints:
//! - GET  /                    - Chat UI
//! - POST /new_chat            - Create an empty chat
//! - POST /send_message        - Append a message and the model's reply
//! - POST /clear_chat          - Remove all messages from a chat
//! - POST /delete_chat         - Remove a chat
//! - GET  /get_chat_history    - Full history document
//! - GET  /get_chat/:chat_id   - One chat
//! - GET  /search_chats?q=     - Chats matching a search term

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::error::AppError;
use crate::http::payload::{is_json_request, Payload};
use crate::http::state::AppState;
use crate::storage::{Chat, ChatMessage, HistoryDocument};

const INDEX_HTML: &str = include_str!("index.html");

/// Body of `POST /send_message`
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Body of `POST /clear_chat` and `POST /delete_chat`
#[derive(Debug, Default, Deserialize)]
pub struct ChatIdRequest {
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Query of `GET /search_chats`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Content and time of one side of an exchange
#[derive(Debug, Serialize)]
pub struct MessageSummary {
    pub content: String,
    pub timestamp: String,
}

impl From<&ChatMessage> for MessageSummary {
    fn from(message: &ChatMessage) -> Self {
        Self {
            content: message.content.clone(),
            timestamp: message.timestamp.clone(),
        }
    }
}

/// Response of `POST /send_message`
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub user_message: MessageSummary,
    pub ai_message: MessageSummary,
    pub chat_id: String,
    pub chat_title: String,
}

/// Response of `GET /search_chats`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub chats: Vec<Chat>,
}

/// `302 Found` back to the chat UI
fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// JSON acknowledgement for JSON callers, redirect home for form posts
fn acknowledge(is_json: bool, message: &str) -> Response {
    if is_json {
        Json(json!({ "success": true, "message": message })).into_response()
    } else {
        redirect_home()
    }
}

/// GET / - Serve the chat UI.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /new_chat - Create an empty chat.
pub async fn new_chat(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut history = state.store.writer().await;
    let chat = history.push_new().clone();
    history.commit().await;

    tracing::info!(chat_id = %chat.id, "Created new chat");

    if is_json_request(&headers) {
        Json(json!({
            "success": true,
            "chat_id": chat.id,
            "chat_title": chat.title,
            "message": "New chat created successfully",
        }))
        .into_response()
    } else {
        redirect_home()
    }
}

/// POST /send_message - Record a message and the model's reply.
pub async fn send_message(
    State(state): State<AppState>,
    Payload { body, .. }: Payload<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let message = body.message.unwrap_or_default().trim().to_string();
    if message.is_empty() {
        return Err(AppError::BadRequest("No message provided".to_string()));
    }

    // Detached so the exchange is committed even if the client goes away
    // while the model is answering.
    let exchange = tokio::spawn(record_exchange(state, message, body.chat_id));
    match exchange.await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Message exchange failed: {}", e);
            Err(AppError::Internal)
        }
    }
}

/// Append the user message and the model's reply to the target chat
async fn record_exchange(
    state: AppState,
    message: String,
    chat_id: Option<String>,
) -> SendMessageResponse {
    let mut history = state.store.writer().await;
    let chat = history.resolve_target(chat_id.as_deref());

    let user_message = ChatMessage::user(message.clone());
    chat.messages.push(user_message.clone());
    if chat.derive_title(&message) {
        tracing::debug!(chat_id = %chat.id, title = %chat.title, "Derived chat title");
    }

    let reply = state
        .gateway
        .complete_with_context(&message, &chat.messages)
        .await;
    let ai_message = ChatMessage::assistant(reply);
    chat.messages.push(ai_message.clone());

    let response = SendMessageResponse {
        success: true,
        user_message: MessageSummary::from(&user_message),
        ai_message: MessageSummary::from(&ai_message),
        chat_id: chat.id.clone(),
        chat_title: chat.title.clone(),
    };
    history.commit().await;

    tracing::debug!(chat_id = %response.chat_id, "Stored message exchange");
    response
}

/// POST /clear_chat - Remove all messages from a chat.
pub async fn clear_chat(
    State(state): State<AppState>,
    Payload { body, is_json }: Payload<ChatIdRequest>,
) -> Response {
    let chat_id = body.chat_id.unwrap_or_default();

    let mut history = state.store.writer().await;
    match history.find_mut(&chat_id) {
        Some(chat) => {
            chat.clear();
            tracing::info!(chat_id = %chat_id, "Cleared chat");
        }
        None => tracing::debug!(chat_id = %chat_id, "Clear requested for unknown chat"),
    }
    history.commit().await;

    acknowledge(is_json, "Chat cleared successfully")
}

/// POST /delete_chat - Remove a chat.
pub async fn delete_chat(
    State(state): State<AppState>,
    Payload { body, is_json }: Payload<ChatIdRequest>,
) -> Response {
    let chat_id = body.chat_id.unwrap_or_default();

    let mut history = state.store.writer().await;
    if history.remove(&chat_id) {
        tracing::info!(chat_id = %chat_id, "Deleted chat");
    } else {
        tracing::debug!(chat_id = %chat_id, "Delete requested for unknown chat");
    }
    history.commit().await;

    acknowledge(is_json, "Chat deleted successfully")
}

/// GET /get_chat_history - Return every chat.
pub async fn get_chat_history(State(state): State<AppState>) -> Json<HistoryDocument> {
    Json(state.store.load().await)
}

/// GET /get_chat/:chat_id - Return one chat.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Chat>, AppError> {
    let history = state.store.load().await;
    history
        .find(&chat_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))
}

/// GET /search_chats - Return chats whose title or messages contain `q`.
pub async fn search_chats(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let history = state.store.load().await;
    let chats = history.search(&query.q);
    tracing::debug!(term = %query.q, matches = chats.len(), "Searched chats");
    Json(SearchResponse { chats })
}
