//! Data models for the library server

pub mod book;
pub mod issue_record;
pub mod validation;

pub use book::{Book, CreateBook};
pub use issue_record::{IssueBook, IssueRecord, IssueRecordWithBook, IssueStatus};
