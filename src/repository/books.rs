//! Books repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::{
    error::AppResult,
    models::book::{Book, BookFields},
};

const BOOK_COLUMNS: &str = "id, title, author, year_published, date_added";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all books, most recently added first
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books ORDER BY date_added DESC, id DESC",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Insert a new book
    pub async fn create(&self, data: &BookFields, date_added: DateTime<Utc>) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (title, author, year_published, date_added)
            VALUES (?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(&data.title)
            .bind(&data.author)
            .bind(data.year_published)
            .bind(date_added)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Overwrite the mutable fields of a book; `id` and `date_added` are left alone
    pub async fn update(&self, id: i64, data: &BookFields) -> AppResult<Option<Book>> {
        let query = format!(
            r#"
            UPDATE books SET title = ?, author = ?, year_published = ?
            WHERE id = ?
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(&data.title)
            .bind(&data.author)
            .bind(data.year_published)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Delete a book, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
