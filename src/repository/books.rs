//! Books table operations

use async_trait::async_trait;

use super::{CatalogStore, PgUnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook},
};

const BOOK_COLUMNS: &str = "id, book_id, title, author, category, quantity";

#[async_trait]
impl CatalogStore for PgUnitOfWork {
    async fn add_book(&mut self, book: &CreateBook) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (book_id, title, author, category, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(&book.book_id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.category)
            .bind(book.quantity)
            .fetch_one(self.conn())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                    format!("Book with ID '{}' already exists", book.book_id),
                ),
                other => other.into(),
            })
    }

    async fn find_book(&mut self, book_id: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE book_id = $1", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(book_id)
            .fetch_optional(self.conn())
            .await?;
        Ok(book)
    }

    async fn lock_book(&mut self, book_id: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE book_id = $1 FOR UPDATE", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(book_id)
            .fetch_optional(self.conn())
            .await?;
        Ok(book)
    }

    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS);
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(self.conn())
            .await?;
        Ok(books)
    }

    async fn adjust_quantity(&mut self, book_id: &str, delta: i32) -> AppResult<Book> {
        let query = format!(
            "UPDATE books SET quantity = quantity + $1 WHERE book_id = $2 RETURNING {}",
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(delta)
            .bind(book_id)
            .fetch_optional(self.conn())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ID '{}' not found", book_id)))
    }
}
