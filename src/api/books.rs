//! Book endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::book::{Book, BookRequest},
    AppState,
};

use super::{BookId, ValidBook};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

/// List all books, most recently added first
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_all().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .books
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Book,
            headers(("Location" = String, description = "Path of the new book"))),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidBook(data): ValidBook,
) -> AppResult<impl IntoResponse> {
    let book = state.services.books.create(&data).await?;
    let location = format!("/api/books/{}", book.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    ValidBook(data): ValidBook,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .books
        .update(id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<StatusCode> {
    if !state.services.books.delete(id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
