/// Task write validation
///
/// A task write (create or update) is valid only if `title`, `description`,
/// and `due_date` are all present and non-empty, and `due_date` parses as an
/// ISO-8601 calendar date (`YYYY-MM-DD`, optionally with a time component).
/// Validation runs before any storage call, so invalid input never mutates
/// persisted state.
///
/// # Example
///
/// ```
/// use taskdeck_shared::validation::validate_task_write;
///
/// assert!(validate_task_write("Ship it", "Tag and publish", "2023-12-31").is_ok());
/// assert!(validate_task_write("Ship it", "Tag and publish", "not-a-date").is_err());
/// assert!(validate_task_write("", "Tag and publish", "2023-12-31").is_err());
/// ```
use chrono::{NaiveDate, NaiveDateTime};

/// Error type for task input validation
///
/// Each variant names the offending field so the API layer can surface
/// field-level details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    /// A required field is missing or empty
    #[error("{0} is required and must not be empty")]
    MissingField(&'static str),

    /// The due date is not a valid ISO-8601 calendar date
    #[error("due_date is not a valid ISO-8601 date: {0}")]
    InvalidDueDate(String),
}

impl TaskValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            TaskValidationError::MissingField(field) => field,
            TaskValidationError::InvalidDueDate(_) => "due_date",
        }
    }
}

/// Parses a due date in extended ISO-8601 form
///
/// Accepts a plain calendar date (`2023-12-31`) or a date-time
/// (`2023-12-31T10:30:00`); the time component is discarded.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, TaskValidationError> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(date);
    }

    raw.parse::<NaiveDateTime>()
        .map(|dt| dt.date())
        .map_err(|_| TaskValidationError::InvalidDueDate(raw.to_string()))
}

/// Validates the user-facing fields of a task write
///
/// Returns the parsed due date on success so callers don't parse twice.
pub fn validate_task_write(
    title: &str,
    description: &str,
    due_date: &str,
) -> Result<NaiveDate, TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::MissingField("title"));
    }
    if description.trim().is_empty() {
        return Err(TaskValidationError::MissingField("description"));
    }
    if due_date.trim().is_empty() {
        return Err(TaskValidationError::MissingField("due_date"));
    }

    parse_due_date(due_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_date() {
        let date = validate_task_write("Title", "Description", "2023-12-31").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_accepts_date_with_time_component() {
        let date = parse_due_date("2023-12-31T10:30:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_rejects_non_date() {
        let err = validate_task_write("Title", "Description", "not-a-date").unwrap_err();
        assert!(matches!(err, TaskValidationError::InvalidDueDate(_)));
        assert_eq!(err.field(), "due_date");
    }

    #[test]
    fn test_rejects_impossible_date() {
        assert!(parse_due_date("2023-02-30").is_err());
        assert!(parse_due_date("2023-13-01").is_err());
    }

    #[test]
    fn test_rejects_empty_fields() {
        assert_eq!(
            validate_task_write("", "Description", "2023-12-31").unwrap_err(),
            TaskValidationError::MissingField("title")
        );
        assert_eq!(
            validate_task_write("Title", "   ", "2023-12-31").unwrap_err(),
            TaskValidationError::MissingField("description")
        );
        assert_eq!(
            validate_task_write("Title", "Description", "").unwrap_err(),
            TaskValidationError::MissingField("due_date")
        );
    }
}
