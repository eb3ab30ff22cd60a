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
    services,
};

#[derive(serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestData {
    #[validate(length(min = 1, message = "Receiver ID cannot be empty"))]
    pub receiver_id: String,
    pub message: Option<String>,
}

pub async fn send_friend_request(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(mut payload): Json<FriendRequestData>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(anyhow!("Invalid friend request data: {}", e)))?;

    payload.receiver_id = payload.receiver_id.trim().to_string();
    if let Some(message) = &mut payload.message {
        *message = message.trim().to_string();
    }

    let receiver_id = Uuid::parse_str(&payload.receiver_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid receiver ID format")))?;

    let request = services::friends::send_request(
        state.store.as_ref(),
        user_id,
        receiver_id,
        payload.message.filter(|m| !m.is_empty()),
    )
    .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "message": "Friend request sent",
            "selectedUserId": request.receiver_id,
            "requestStatus": request.status,
        })),
    ))
}

/// Every friend request the acting user appears in, newest first. Rows use
/// the generic model serialization, unlike the computed endpoints below.
pub async fn list_my_requests(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let requests = services::friends::my_requests(state.store.as_ref(), user_id).await?;
    Ok(Json(requests))
}

pub async fn friends_overview(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid user ID format")))?;

    let overview = services::friends::friends_overview(state.store.as_ref(), user_id).await?;

    let pending_requests: Vec<_> = overview
        .pending
        .iter()
        .map(|p| {
            json!({
                "requestId": p.request.id,
                "senderId": p.sender.id,
                "name": p.sender.name,
                "email": p.sender.email,
                "image": p.sender.avatar_url,
            })
        })
        .collect();

    Ok(Json(json!({
        "friends": overview.friends,
        "pendingRequests": pending_requests,
    })))
}

#[derive(serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendActionPayload {
    #[validate(length(min = 1, message = "Selected user ID cannot be empty"))]
    pub selected_user_id: String,
}

fn parse_selected_user(payload: &FriendActionPayload) -> AppResult<Uuid> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(anyhow!("Invalid friend action data: {}", e)))?;
    Uuid::parse_str(payload.selected_user_id.trim())
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid selected user ID format")))
}

pub async fn accept_friend_request(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<FriendActionPayload>,
) -> AppResult<impl IntoResponse> {
    let selected_user_id = parse_selected_user(&payload)?;

    services::friends::accept_request(state.store.as_ref(), user_id, selected_user_id).await?;

    Ok(Json(json!({
        "message": "Friend request accepted successfully",
        "selectedUserId": selected_user_id,
    })))
}

pub async fn cancel_friend_request(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<FriendActionPayload>,
) -> AppResult<impl IntoResponse> {
    let selected_user_id = parse_selected_user(&payload)?;

    services::friends::cancel_request(state.store.as_ref(), user_id, selected_user_id).await?;

    Ok(Json(json!({
        "message": "Friend request canceled successfully",
        "selectedUserId": selected_user_id,
    })))
}

pub async fn remove_friend(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<FriendActionPayload>,
) -> AppResult<impl IntoResponse> {
    let selected_user_id = parse_selected_user(&payload)?;

    services::friends::remove_friend(state.store.as_ref(), user_id, selected_user_id).await?;

    Ok(Json(json!({
        "message": "Friend removed successfully",
        "selectedUserId": selected_user_id,
    })))
}
