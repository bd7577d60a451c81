//! Issue/return rules and inventory bookkeeping
//!
//! Each operation runs inside a single unit of work: the stock adjustment and
//! the ledger write are committed together or not at all.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, IssueRecord, IssueRecordWithBook, IssueStatus},
    repository::{Store, UnitOfWork},
};

#[derive(Clone)]
pub struct CirculationService {
    store: Arc<dyn Store>,
}

impl CirculationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Lend one copy of `book_id` to a student
    pub async fn issue_book(
        &self,
        student_name: &str,
        book_id: &str,
        issue_date: NaiveDate,
    ) -> AppResult<IssueRecord> {
        let mut uow = self.store.begin().await?;

        let book = uow
            .lock_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ID '{}' not found", book_id)))?;

        if book.quantity <= 0 {
            tracing::debug!(book_id, "Issue rejected: out of stock");
            return Err(AppError::OutOfStock(format!(
                "Book '{}' is currently out of stock",
                book.title
            )));
        }

        let book = uow.adjust_quantity(&book.book_id, -1).await?;
        let record = uow.create_record(student_name, &book.book_id, issue_date).await?;
        uow.commit().await?;

        tracing::info!(
            book_id = %book.book_id,
            record_id = record.id,
            quantity = book.quantity,
            "Book issued"
        );
        Ok(record)
    }

    /// Close an issue record and put the copy back in stock
    pub async fn return_book(&self, record_id: i32, return_date: NaiveDate) -> AppResult<IssueRecord> {
        let mut uow = self.store.begin().await?;

        let record = uow.lock_record(record_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Issue record with ID {} not found", record_id))
        })?;

        if record.is_returned() {
            tracing::debug!(record_id, "Return rejected: already returned");
            return Err(AppError::Conflict("This book has already been returned".to_string()));
        }

        let record = uow.mark_returned(record_id, return_date).await?;

        // A record whose book has left the catalog still closes
        match uow.lock_book(&record.book_id).await? {
            Some(book) => {
                let book = uow.adjust_quantity(&book.book_id, 1).await?;
                uow.commit().await?;
                tracing::info!(
                    book_id = %book.book_id,
                    record_id,
                    quantity = book.quantity,
                    "Book returned"
                );
            }
            None => {
                uow.commit().await?;
                tracing::warn!(
                    book_id = %record.book_id,
                    record_id,
                    "Book returned but no longer in catalog, quantity not adjusted"
                );
            }
        }

        Ok(record)
    }

    /// Records still out on loan, with book title and author
    pub async fn list_issued(&self) -> AppResult<Vec<IssueRecordWithBook>> {
        let mut uow = self.store.begin().await?;
        let records = uow.list_by_status(IssueStatus::Issued).await?;
        let enriched = enrich(uow.as_mut(), records).await;
        uow.commit().await?;
        Ok(enriched)
    }

    /// Every record, issued and returned, with book title and author
    pub async fn list_all_records(&self) -> AppResult<Vec<IssueRecordWithBook>> {
        let mut uow = self.store.begin().await?;
        let records = uow.list_all().await?;
        let enriched = enrich(uow.as_mut(), records).await;
        uow.commit().await?;
        Ok(enriched)
    }
}

/// Attach book details to each record. Never fails: a book that cannot be
/// read degrades to the "Unknown" placeholder.
async fn enrich(uow: &mut dyn UnitOfWork, records: Vec<IssueRecord>) -> Vec<IssueRecordWithBook> {
    let books: HashMap<String, Book> = match uow.list_books().await {
        Ok(books) => books.into_iter().map(|b| (b.book_id.clone(), b)).collect(),
        Err(e) => {
            tracing::warn!("Book lookup failed while listing issue records: {}", e);
            HashMap::new()
        }
    };

    records
        .into_iter()
        .map(|record| {
            let book = books.get(&record.book_id);
            if book.is_none() {
                tracing::warn!(book_id = %record.book_id, record_id = record.id, "Issue record references unknown book");
            }
            IssueRecordWithBook::new(record, book)
        })
        .collect()
}
