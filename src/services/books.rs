//! Books service

use chrono::{Datelike, Utc};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFields, MIN_YEAR_PUBLISHED},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books, most recently added first
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a book by ID, `None` if it does not exist
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book stamped with the current instant
    pub async fn create(&self, data: &BookFields) -> AppResult<Book> {
        validate_year_published(data.year_published, current_year())?;

        let book = self.repository.books.create(data, Utc::now()).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    /// Replace title, author and year of an existing book.
    ///
    /// Returns `Ok(None)` when no book has this ID; the year is only checked
    /// once the book is known to exist.
    pub async fn update(&self, id: i64, data: &BookFields) -> AppResult<Option<Book>> {
        if self.repository.books.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        validate_year_published(data.year_published, current_year())?;

        let book = self.repository.books.update(id, data).await?;
        if book.is_some() {
            tracing::info!(book_id = id, "Book updated");
        }
        Ok(book)
    }

    /// Delete a book permanently. Returns `false` when no book has this ID.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let deleted = self.repository.books.delete(id).await?;
        if deleted {
            tracing::info!(book_id = id, "Book deleted");
        }
        Ok(deleted)
    }
}

/// Publication year upper bound: the current UTC year, read on every call
fn current_year() -> i32 {
    Utc::now().year()
}

/// Check `MIN_YEAR_PUBLISHED <= year <= current_year`
pub fn validate_year_published(year: i32, current_year: i32) -> AppResult<()> {
    if year < MIN_YEAR_PUBLISHED || year > current_year {
        return Err(AppError::Validation(format!(
            "Year published must be between {} and {}",
            MIN_YEAR_PUBLISHED, current_year
        )));
    }
    Ok(())
}
