//! Book (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::not_blank;

/// Book record from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// System-assigned id
    pub id: i32,
    /// External catalog key, unique
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    /// Copies currently available for issue
    pub quantity: i32,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(custom(function = "not_blank"))]
    pub book_id: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    #[validate(range(min = 0, message = "Quantity must be non-negative"))]
    pub quantity: i32,
}

impl CreateBook {
    /// Copy with every text field trimmed
    pub fn normalized(self) -> Self {
        Self {
            book_id: self.book_id.trim().to_string(),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            category: self.category.trim().to_string(),
            quantity: self.quantity,
        }
    }
}
