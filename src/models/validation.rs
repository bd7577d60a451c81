//! Explicit validation helpers used at the API boundary

use std::borrow::Cow;

use validator::ValidationError;

use crate::error::{AppError, AppResult};

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// Database ids are strictly positive
pub fn positive_id(id: i32, what: &str) -> AppResult<i32> {
    if id <= 0 {
        return Err(AppError::Validation(format!("{} must be a positive integer", what)));
    }
    Ok(id)
}
