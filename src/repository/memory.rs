//! In-memory store for tests
//!
//! Units of work buffer their writes as row images and apply them on commit.
//! Isolation comes only from row locks: `lock_book` and `lock_record` hold a
//! per-row mutex until the unit of work ends, while plain reads see the last
//! committed state. A read-modify-write without the row lock can lose an
//! update, the same way it would against the database.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicI32, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{CatalogStore, IssueLedger, Store, UnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, IssueRecord, IssueStatus},
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    books: Vec<Book>,
    records: Vec<IssueRecord>,
}

#[derive(Debug, Clone)]
enum Write {
    InsertBook(Book),
    SetQuantity { book_id: String, quantity: i32 },
    InsertRecord(IssueRecord),
    UpdateRecord(IssueRecord),
}

impl MemoryState {
    fn apply(&mut self, write: &Write) {
        match write {
            Write::InsertBook(book) => self.books.push(book.clone()),
            Write::SetQuantity { book_id, quantity } => {
                if let Some(book) = self.books.iter_mut().find(|b| &b.book_id == book_id) {
                    book.quantity = *quantity;
                }
            }
            Write::InsertRecord(record) => self.records.push(record.clone()),
            Write::UpdateRecord(record) => {
                if let Some(row) = self.records.iter_mut().find(|r| r.id == record.id) {
                    *row = record.clone();
                }
            }
        }
    }

    /// Row-level constraints checked at commit
    fn check(&self, write: &Write) -> AppResult<()> {
        match write {
            Write::InsertBook(book) if self.books.iter().any(|b| b.book_id == book.book_id) => Err(
                AppError::Conflict(format!("Book with ID '{}' already exists", book.book_id)),
            ),
            Write::SetQuantity { book_id, quantity } if *quantity < 0 => Err(AppError::Internal(
                format!("Quantity of '{}' would go negative", book_id),
            )),
            _ => Ok(()),
        }
    }
}

type RowLocks<K> = Mutex<HashMap<K, Arc<Mutex<()>>>>;

#[derive(Default)]
struct Shared {
    state: Mutex<MemoryState>,
    book_locks: RowLocks<String>,
    record_locks: RowLocks<i32>,
    next_book_id: AtomicI32,
    next_record_id: AtomicI32,
    fail_book_listing: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current quantity of a book, if it exists
    pub async fn quantity(&self, book_id: &str) -> Option<i32> {
        let state = self.shared.state.lock().await;
        state.books.iter().find(|b| b.book_id == book_id).map(|b| b.quantity)
    }

    pub async fn record_count(&self) -> usize {
        self.shared.state.lock().await.records.len()
    }

    pub async fn records(&self) -> Vec<IssueRecord> {
        self.shared.state.lock().await.records.clone()
    }

    /// Drop a book from the catalog, leaving its records behind
    pub async fn remove_book(&self, book_id: &str) {
        self.shared.state.lock().await.books.retain(|b| b.book_id != book_id);
    }

    /// Make every subsequent `list_books` call fail
    pub fn fail_book_listing(&self) {
        self.shared.fail_book_listing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            shared: self.shared.clone(),
            writes: Vec::new(),
            held_books: HashSet::new(),
            held_records: HashSet::new(),
            guards: Vec::new(),
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

pub struct MemoryUnitOfWork {
    shared: Arc<Shared>,
    writes: Vec<Write>,
    held_books: HashSet<String>,
    held_records: HashSet<i32>,
    guards: Vec<OwnedMutexGuard<()>>,
}

impl MemoryUnitOfWork {
    /// Committed state with this unit's own pending writes on top
    async fn view(&self) -> MemoryState {
        // Stand-in for a round trip, lets concurrent units interleave
        tokio::task::yield_now().await;

        let mut state = self.shared.state.lock().await.clone();
        for write in &self.writes {
            state.apply(write);
        }
        state
    }

    async fn acquire<K>(locks: &RowLocks<K>, key: K) -> OwnedMutexGuard<()>
    where
        K: std::hash::Hash + Eq,
    {
        let row = locks.lock().await.entry(key).or_default().clone();
        row.lock_owned().await
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut state = self.shared.state.lock().await;

        let mut next = state.clone();
        for write in &self.writes {
            next.check(write)?;
            next.apply(write);
        }
        *state = next;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryUnitOfWork {
    async fn add_book(&mut self, book: &CreateBook) -> AppResult<Book> {
        if self.view().await.books.iter().any(|b| b.book_id == book.book_id) {
            return Err(AppError::Conflict(format!(
                "Book with ID '{}' already exists",
                book.book_id
            )));
        }

        let created = Book {
            id: self.shared.next_book_id.fetch_add(1, Ordering::SeqCst) + 1,
            book_id: book.book_id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            quantity: book.quantity,
        };
        self.writes.push(Write::InsertBook(created.clone()));
        Ok(created)
    }

    async fn find_book(&mut self, book_id: &str) -> AppResult<Option<Book>> {
        Ok(self.view().await.books.into_iter().find(|b| b.book_id == book_id))
    }

    async fn lock_book(&mut self, book_id: &str) -> AppResult<Option<Book>> {
        if self.held_books.insert(book_id.to_string()) {
            let guard = Self::acquire(&self.shared.book_locks, book_id.to_string()).await;
            self.guards.push(guard);
        }
        self.find_book(book_id).await
    }

    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        if self.shared.fail_book_listing.load(Ordering::SeqCst) {
            return Err(AppError::Internal("book listing unavailable".to_string()));
        }
        Ok(self.view().await.books)
    }

    async fn adjust_quantity(&mut self, book_id: &str, delta: i32) -> AppResult<Book> {
        let mut book = self
            .find_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ID '{}' not found", book_id)))?;

        book.quantity += delta;
        self.writes.push(Write::SetQuantity {
            book_id: book.book_id.clone(),
            quantity: book.quantity,
        });
        Ok(book)
    }
}

#[async_trait]
impl IssueLedger for MemoryUnitOfWork {
    async fn create_record(
        &mut self,
        student_name: &str,
        book_id: &str,
        issue_date: NaiveDate,
    ) -> AppResult<IssueRecord> {
        let record = IssueRecord {
            id: self.shared.next_record_id.fetch_add(1, Ordering::SeqCst) + 1,
            student_name: student_name.to_string(),
            book_id: book_id.to_string(),
            issue_date,
            return_date: None,
            status: IssueStatus::Issued,
        };
        self.writes.push(Write::InsertRecord(record.clone()));
        Ok(record)
    }

    async fn find_record(&mut self, id: i32) -> AppResult<Option<IssueRecord>> {
        Ok(self.view().await.records.into_iter().find(|r| r.id == id))
    }

    async fn lock_record(&mut self, id: i32) -> AppResult<Option<IssueRecord>> {
        if self.held_records.insert(id) {
            let guard = Self::acquire(&self.shared.record_locks, id).await;
            self.guards.push(guard);
        }
        self.find_record(id).await
    }

    async fn list_by_status(&mut self, status: IssueStatus) -> AppResult<Vec<IssueRecord>> {
        Ok(self
            .view()
            .await
            .records
            .into_iter()
            .filter(|r| r.status == status)
            .collect())
    }

    async fn list_all(&mut self) -> AppResult<Vec<IssueRecord>> {
        Ok(self.view().await.records)
    }

    async fn mark_returned(&mut self, id: i32, return_date: NaiveDate) -> AppResult<IssueRecord> {
        let mut record = self
            .find_record(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue record with ID {} not found", id)))?;

        if record.is_returned() {
            return Err(AppError::Conflict("This book has already been returned".to_string()));
        }

        record.status = IssueStatus::Returned;
        record.return_date = Some(return_date);
        self.writes.push(Write::UpdateRecord(record.clone()));
        Ok(record)
    }
}
