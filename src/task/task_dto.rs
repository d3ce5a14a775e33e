use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

pub const TITLE_REQUIRED: &str = "Title is required";

/// Body of `POST /tasks`. `id`, `completed` and `createdAt` are assigned by
/// the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateTaskDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    pub description: String,
}

impl CreateTaskDto {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Copy with surrounding whitespace removed from both fields.
    pub fn trimmed(&self) -> Self {
        Self::new(self.title.trim(), self.description.trim())
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed(TITLE_REQUIRED));
        return Err(err);
    }
    Ok(())
}

/// First human-readable message in a set of validation errors.
pub fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
