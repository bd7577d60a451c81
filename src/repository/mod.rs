//! Repository layer for database operations
//!
//! Services talk to storage through [`Store`]: every operation opens one
//! [`UnitOfWork`], reads and writes through the catalog and ledger methods,
//! then commits. Dropping a unit of work without committing discards it.

pub mod books;
pub mod issue_records;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, IssueRecord, IssueStatus},
};

/// Book storage
#[async_trait]
pub trait CatalogStore: Send {
    /// Insert a book; `Conflict` if `book_id` is taken
    async fn add_book(&mut self, book: &CreateBook) -> AppResult<Book>;

    async fn find_book(&mut self, book_id: &str) -> AppResult<Option<Book>>;

    /// Like `find_book`, but holds the row until the unit of work ends
    async fn lock_book(&mut self, book_id: &str) -> AppResult<Option<Book>>;

    async fn list_books(&mut self) -> AppResult<Vec<Book>>;

    /// Apply `delta` to the available quantity. The caller keeps it >= 0.
    async fn adjust_quantity(&mut self, book_id: &str, delta: i32) -> AppResult<Book>;

    async fn get_book(&mut self, book_id: &str) -> AppResult<Book> {
        self.find_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ID '{}' not found", book_id)))
    }
}

/// Issue record storage
#[async_trait]
pub trait IssueLedger: Send {
    /// New record with status `issued` and no return date
    async fn create_record(
        &mut self,
        student_name: &str,
        book_id: &str,
        issue_date: NaiveDate,
    ) -> AppResult<IssueRecord>;

    async fn find_record(&mut self, id: i32) -> AppResult<Option<IssueRecord>>;

    /// Like `find_record`, but holds the row until the unit of work ends
    async fn lock_record(&mut self, id: i32) -> AppResult<Option<IssueRecord>>;

    async fn list_by_status(&mut self, status: IssueStatus) -> AppResult<Vec<IssueRecord>>;

    async fn list_all(&mut self) -> AppResult<Vec<IssueRecord>>;

    /// Close an issued record; `Conflict` if it is already returned
    async fn mark_returned(&mut self, id: i32, return_date: NaiveDate) -> AppResult<IssueRecord>;

    async fn get_record(&mut self, id: i32) -> AppResult<IssueRecord> {
        self.find_record(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue record with ID {} not found", id)))
    }
}

/// One atomic unit of work over both tables
#[async_trait]
pub trait UnitOfWork: CatalogStore + IssueLedger {
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Entry point to the persistent state
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Cheap connectivity check
    async fn ping(&self) -> AppResult<()>;

    /// Release all connections; called once at shutdown
    async fn close(&self);
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct Repository {
    pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for Repository {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A unit of work backed by a database transaction
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
