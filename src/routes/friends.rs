use crate::app_state::AppState;
use crate::handlers::friends;
use axum::routing::{get, post};
use axum::Router;

pub fn friends_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(friends::send_friend_request).get(friends::list_my_requests),
        )
        .route("/friends/{user_id}", get(friends::friends_overview))
        .route("/accept", post(friends::accept_friend_request))
        .route("/cancel", post(friends::cancel_friend_request))
        .route("/remove", post(friends::remove_friend))
}
