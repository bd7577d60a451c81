//! Book management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{Book, CreateBook},
};

/// Add a new book to the library
#[utoipa::path(
    post,
    path = "/api/books/",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or book_id already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    request.validate()?;

    let created = state.services.catalog.add_book(request.normalized()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Retrieve all books from the library
#[utoipa::path(
    get,
    path = "/api/books/",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get a specific book by its book_id
#[utoipa::path(
    get,
    path = "/api/books/{book_id}",
    tag = "books",
    params(
        ("book_id" = String, Path, description = "External book identifier")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&book_id).await?;
    Ok(Json(book))
}
