//! Catalog management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook},
    repository::Store,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Add a book to the catalog. `Conflict` if its `book_id` already exists.
    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        let mut uow = self.store.begin().await?;

        if uow.find_book(&book.book_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Book with ID '{}' already exists",
                book.book_id
            )));
        }

        let created = uow.add_book(&book).await?;
        uow.commit().await?;

        tracing::info!(book_id = %created.book_id, quantity = created.quantity, "Book added");
        Ok(created)
    }

    pub async fn get_book(&self, book_id: &str) -> AppResult<Book> {
        let mut uow = self.store.begin().await?;
        let book = uow.get_book(book_id).await?;
        uow.commit().await?;
        Ok(book)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let mut uow = self.store.begin().await?;
        let books = uow.list_books().await?;
        uow.commit().await?;
        Ok(books)
    }
}
