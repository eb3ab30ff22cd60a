use anyhow::anyhow;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;

/// Set by the fronting auth proxy; the backend itself issues no credentials.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user for the request. Extracted once at the handler boundary so
/// no ambient identity state exists below it.
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(anyhow!("Missing user identity")))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized(anyhow!("Invalid user identity header")))?;

        let user_id = Uuid::parse_str(value.trim())
            .map_err(|_| AppError::Unauthorized(anyhow!("Invalid user identity header")))?;

        Ok(CurrentUser(user_id))
    }
}
