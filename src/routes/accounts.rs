use crate::app_state::AppState;
use crate::handlers::accounts;
use axum::{routing::get, routing::post, Router};

pub fn accounts_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(accounts::register)) // /api/auth/register
        .route("/users", get(accounts::list_users))
        .route("/users/all", get(accounts::all_users))
        .route("/users/{user_id}/profile", get(accounts::profile))
}
