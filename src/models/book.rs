//! Book model and request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

pub const MIN_YEAR_PUBLISHED: i32 = 1000;

/// Book record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year_published: i32,
    /// Creation instant (UTC), never modified
    pub date_added: DateTime<Utc>,
}

/// Create / update book request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 255, message = "Title must be between 1 and 255 characters")
    )]
    #[schema(value_type = String, min_length = 1, max_length = 255)]
    pub title: Option<String>,
    #[validate(
        required(message = "Author is required"),
        length(min = 1, max = 255, message = "Author must be between 1 and 255 characters")
    )]
    #[schema(value_type = String, min_length = 1, max_length = 255)]
    pub author: Option<String>,
    #[validate(required(message = "Year published is required"))]
    #[schema(value_type = i32, example = 1965)]
    pub year_published: Option<i32>,
}

/// Shape-checked book fields handed to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year_published: i32,
}

impl BookRequest {
    /// Check the request shape and extract its fields.
    ///
    /// Whitespace-only title or author counts as missing.
    pub fn into_fields(self) -> Result<BookFields, ValidationErrors> {
        self.validate()?;

        let mut errors = ValidationErrors::new();
        let title = non_blank(self.title, "title", "Title is required", &mut errors);
        let author = non_blank(self.author, "author", "Author is required", &mut errors);

        match (title, author, self.year_published) {
            (Some(title), Some(author), Some(year_published)) if errors.errors().is_empty() => {
                Ok(BookFields {
                    title,
                    author,
                    year_published,
                })
            }
            _ => Err(errors),
        }
    }
}

fn non_blank(
    value: Option<String>,
    field: &'static str,
    message: &'static str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            let mut err = ValidationError::new("required");
            err.message = Some(message.into());
            errors.add(field, err);
            None
        }
    }
}
