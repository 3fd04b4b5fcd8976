use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, Uri, header::CONTENT_TYPE},
    response::{Html, IntoResponse},
};

use tracing::info;

use crate::credential::Credential;
use crate::error::ApiError;
use crate::model::Book;
use crate::store::BookStore;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Upper bound on a create request body. Anything larger counts as a failed
/// read.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookStore>,
    pub credential: Arc<Credential>,
    pub admin_page: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<BookStore>, credential: Credential, admin_page: impl Into<PathBuf>) -> Self {
        AppState {
            store,
            credential: Arc::new(credential),
            admin_page: Arc::new(admin_page.into()),
        }
    }
}

pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    let books = state.store.list();
    tracing::debug!(count = books.len(), "listed books");
    Json(books)
}

/// Creates a book. Checks run in a fixed order and the first failure wins:
/// credentials, body read, content type, JSON shape.
pub async fn create_book(State(state): State<AppState>, request: Request) -> Result<StatusCode, ApiError> {
    let (parts, body) = request.into_parts();

    if !state.credential.authorize(&parts.headers) {
        tracing::warn!(path = %parts.uri.path(), "rejected create: bad credentials");
        return Err(ApiError::Unauthorized);
    }

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Internal(crate::error::unpack_error(&e)))?;

    if !is_json(&parts.headers) {
        return Err(ApiError::UnsupportedMediaType);
    }

    let book: Book = serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    let id = state.store.insert(book);
    info!(id = %id, "created book");

    Ok(StatusCode::OK)
}

pub async fn get_book(State(state): State<AppState>, uri: Uri) -> Result<Json<Book>, ApiError> {
    let id = book_id(uri.path())?;
    state.store.get(id).map(Json).ok_or(ApiError::NotFound)
}

pub async fn delete_book(State(state): State<AppState>, uri: Uri) -> Result<StatusCode, ApiError> {
    let id = book_id(uri.path())?;
    if state.store.delete(id) {
        info!(id = %id, "deleted book");
    }
    Ok(StatusCode::OK)
}

pub async fn admin_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<Vec<u8>>, ApiError> {
    if !state.credential.authorize(&headers) {
        tracing::warn!("rejected admin page: bad credentials");
        return Err(ApiError::Unauthorized);
    }

    let page = tokio::fs::read(state.admin_page.as_path()).await.map_err(|e| {
        ApiError::Internal(format!("unable to read admin panel {:?}: {}", state.admin_page, e))
    })?;

    Ok(Html(page))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "not allowed")
}

/// Only the exact media type is accepted; parameters such as `charset` are not.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct == JSON_CONTENT_TYPE)
}

/// Extracts the id from `/books/{id}`. The path must split into exactly three
/// slash separated segments.
pub fn book_id(path: &str) -> Result<&str, ApiError> {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [_, _, id] => Ok(*id),
        _ => Err(ApiError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_book_id() {
        assert_eq!(book_id("/books/1").unwrap(), "1");
        assert_eq!(book_id("/books/1729000000000000000").unwrap(), "1729000000000000000");
        assert_eq!(book_id("/books/").unwrap(), "");
        assert!(matches!(book_id("/books/1/extra"), Err(ApiError::NotFound)));
        assert!(matches!(book_id("/books"), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_is_json_exact_match() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        assert!(!is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }
}
