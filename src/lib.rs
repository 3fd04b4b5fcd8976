use std::path::Path;

use axum::{
    Router,
    http::Method,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::handler::{
    AppState, admin_page, create_book, delete_book, get_book, list_books, method_not_allowed,
};

pub mod config;
pub mod credential;
pub mod error;
pub mod handler;
pub mod model;
pub mod store;

/// Builds the full route table. Paths that match no route are served from
/// `static_dir`.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route(
            "/books",
            get(list_books).post(create_book).fallback(method_not_allowed),
        )
        // `*rest` needs at least one character, so `/books/` is routed on its own.
        .route(
            "/books/",
            get(get_book).delete(delete_book).fallback(method_not_allowed),
        )
        .route(
            "/books/*rest",
            get(get_book).delete(delete_book).fallback(method_not_allowed),
        )
        .route("/admin", get(admin_page))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
        .with_state(state)
}
