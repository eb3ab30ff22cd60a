use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    middlewares::auth::CurrentUser,
    models::accounts::Account,
    models::messages::MessageType,
    services,
    store::Store,
};

#[derive(serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[validate(length(min = 1, message = "Recipient ID cannot be empty"))]
    pub recipient_id: String,
    pub message_type: Option<MessageType>,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
}

pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(mut payload): Json<SendMessagePayload>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(anyhow!("Invalid message data: {}", e)))?;

    payload.recipient_id = payload.recipient_id.trim().to_string();
    let recipient_id = Uuid::parse_str(&payload.recipient_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid recipient ID format")))?;

    services::messages::send(
        state.store.as_ref(),
        user_id,
        recipient_id,
        payload.message_type.unwrap_or(MessageType::Text),
        payload.content,
        payload.attachment_url,
    )
    .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "message": "Message sent successfully",
        })),
    ))
}

/// Account detail, historically served under the messages prefix.
pub async fn user_detail(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid user ID format")))?;

    let account = services::accounts::profile(state.store.as_ref(), user_id).await?;
    Ok(Json(account))
}

pub async fn conversation(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((sender_id, recipient_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let sender_id = Uuid::parse_str(&sender_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid sender ID format")))?;
    let recipient_id = Uuid::parse_str(&recipient_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid recipient ID format")))?;

    let messages =
        services::messages::conversation(state.store.as_ref(), user_id, sender_id, recipient_id)
            .await?;

    let participants: HashMap<Uuid, Account> = state
        .store
        .accounts_by_ids(&[sender_id, recipient_id])
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let formatted: Vec<_> = messages
        .iter()
        .map(|m| {
            json!({
                "messageId": m.id,
                "sender": participants.get(&m.sender_id).map(|a| json!({
                    "id": a.id,
                    "name": a.name,
                    "email": a.email,
                })),
                "recipientId": m.recipient_id,
                "messageType": m.message_type,
                "content": m.content,
                "attachmentUrl": m.attachment_url,
                "imageUrl": m.legacy_image_url(),
                "isRead": m.is_read,
                "timestamp": m.created_at,
            })
        })
        .collect();

    Ok(Json(formatted))
}

#[derive(serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadPayload {
    #[validate(length(min = 1, message = "Message ID cannot be empty"))]
    pub message_id: String,
}

pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<MarkReadPayload>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(anyhow!("Invalid message data: {}", e)))?;

    let message_id = Uuid::parse_str(payload.message_id.trim())
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid message ID format")))?;

    let message = services::messages::mark_read(state.store.as_ref(), user_id, message_id).await?;

    Ok(Json(json!({
        "message": "Message marked as read",
        "messageId": message.id,
    })))
}

#[derive(serde::Deserialize)]
pub struct DeleteMessagesPayload {
    pub messages: Vec<String>,
}

pub async fn delete_messages(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<DeleteMessagesPayload>,
) -> AppResult<impl IntoResponse> {
    let mut message_ids = Vec::with_capacity(payload.messages.len());
    for id in &payload.messages {
        let id = Uuid::parse_str(id.trim())
            .map_err(|_| AppError::BadRequest(anyhow!("Invalid message ID format")))?;
        message_ids.push(id);
    }

    let deleted =
        services::messages::delete_messages(state.store.as_ref(), user_id, &message_ids).await?;

    Ok(Json(json!({
        "message": format!("{} message(s) deleted successfully", deleted),
        "deletedCount": deleted,
    })))
}

pub async fn chats(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(path_user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let path_user_id = Uuid::parse_str(&path_user_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid user ID format")))?;

    let messages =
        services::messages::chats_for(state.store.as_ref(), user_id, path_user_id).await?;

    Ok(Json(json!({ "messages": messages })))
}
