use crate::error::{AppError, Result};

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Validates a todo title.
///
/// # Arguments
///
/// * `title` - The title to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the title is valid.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation(
            "Title must not be empty".to_string(),
        ));
    }

    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }

    Ok(())
}
