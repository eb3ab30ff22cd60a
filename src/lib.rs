pub mod app_state;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
