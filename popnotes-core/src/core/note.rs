use crate::{PopnotesError, Result};
use serde::{Deserialize, Serialize};

/// A persisted title/body record.
///
/// `id` is assigned by the store on insert and never reused, so it is stable
/// for the lifetime of the note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: i64,
}

/// Checks a title typed by the user before it is handed to the store.
///
/// The store itself does not re-validate; this is the caller's contract.
///
/// # Errors
///
/// Returns [`PopnotesError::ValidationFailed`] if `title` is empty after trimming.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PopnotesError::ValidationFailed(
            "Title cannot be empty.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_serializes_camel_case() {
        let note = Note {
            id: 7,
            title: "Groceries".to_string(),
            body: String::new(),
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"createdAt\":1700000000"));
        assert!(json.contains("\"id\":7"));
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("T").is_ok());
        assert!(validate_title("  padded  ").is_ok());
        assert!(matches!(
            validate_title("   \t\n"),
            Err(PopnotesError::ValidationFailed(_))
        ));
        assert!(validate_title("").is_err());
    }
}
