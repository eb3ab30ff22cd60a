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
    models::accounts::NewAccount,
    services,
};

#[derive(serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters long"
    ))]
    pub name: String,
    // legacy clients send the avatar URL as `image`
    pub image: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(anyhow!("Invalid registration data: {}", e)))?;

    payload.email = payload.email.trim().to_string();
    payload.name = payload.name.trim().to_string();
    if let Some(image) = &mut payload.image {
        *image = image.trim().to_string();
    }

    let account = services::accounts::register(
        state.store.as_ref(),
        NewAccount {
            email: payload.email,
            name: payload.name,
            avatar_url: payload.image.filter(|url| !url.is_empty()),
        },
    )
    .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": account,
        })),
    ))
}

/// Accounts the acting user could still befriend: excludes themselves and
/// every accepted friend.
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let users = services::accounts::discoverable_users(state.store.as_ref(), user_id).await?;
    Ok(Json(users))
}

pub async fn all_users(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let users = services::accounts::all_users(state.store.as_ref(), user_id).await?;
    Ok(Json(users))
}

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(_user_id): CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| AppError::BadRequest(anyhow!("Invalid user ID format")))?;

    let account = services::accounts::profile(state.store.as_ref(), user_id).await?;
    Ok(Json(account))
}
