mod accounts;
mod friends;
mod index;
mod messages;

use crate::app_state::AppState;
use crate::middlewares::auth::USER_ID_HEADER;
use axum::http::{header, HeaderName};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub fn create_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ]);

    Router::new()
        .merge(index::index_route())
        .nest("/api/auth", accounts::accounts_routes())
        .nest("/api/friends", friends::friends_routes())
        .nest("/api/messages", messages::messages_routes())
        .layer(cors)
}
