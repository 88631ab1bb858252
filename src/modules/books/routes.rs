use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bookstore_http::error::AppError;

use super::models::{Book, BookPayload};
use super::service::BookService;

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", post(create_book))
        .route("/{isbn}", get(get_book).put(update_book))
        .route("/isbn/{isbn}", get(get_book))
        .with_state(service)
}

async fn create_book(
    State(service): State<BookService>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let book = service.create_book(&payload).await?;
    let location = format!("/books/{}", book.isbn);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

async fn update_book(
    State(service): State<BookService>,
    Path(isbn): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    Ok(Json(service.update_book(&isbn, &payload).await?))
}

async fn get_book(
    State(service): State<BookService>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.get_book(&isbn).await?))
}
