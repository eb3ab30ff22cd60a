use crate::app_state::AppState;
use crate::handlers::messages;
use axum::routing::{get, post};
use axum::Router;

pub fn messages_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::send_message))
        .route("/user/{user_id}", get(messages::user_detail))
        .route("/read", post(messages::mark_read))
        .route("/delete", post(messages::delete_messages))
        .route("/chats/{user_id}", get(messages::chats))
        // static prefixes above take priority over the two-param match
        .route("/{sender_id}/{recipient_id}", get(messages::conversation))
}
