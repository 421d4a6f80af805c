//! Appreciation domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThanklyError};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_TEXT_CHARS: usize = 280;

/// One dated journal entry.
///
/// `id` and `date` are fixed at creation; only title and text change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appreciation {
    /// Creation time in milliseconds, bumped when needed to stay unique.
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

impl Appreciation {
    /// Case-insensitive substring match on title or text.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.text.to_lowercase().contains(needle_lower)
            || self
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle_lower))
    }
}

/// Title and text after trimming and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryContent {
    pub title: Option<String>,
    pub text: String,
}

impl EntryContent {
    /// Trims both fields, drops an empty title and enforces the limits.
    pub fn validate(title: Option<&str>, text: &str) -> Result<Self> {
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let text = text.trim();

        if title.is_none() && text.is_empty() {
            return Err(ThanklyError::BlankEntry);
        }
        if title.is_some_and(|t| t.chars().count() > MAX_TITLE_CHARS) {
            return Err(ThanklyError::TooLong {
                field: "title",
                max: MAX_TITLE_CHARS,
            });
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ThanklyError::TooLong {
                field: "text",
                max: MAX_TEXT_CHARS,
            });
        }

        Ok(Self {
            title: title.map(str::to_string),
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_drops_empty_title() {
        let content = EntryContent::validate(Some("   "), "  sunny walk ").unwrap();
        assert_eq!(content.title, None);
        assert_eq!(content.text, "sunny walk");
    }

    #[test]
    fn test_validate_rejects_blank() {
        assert_eq!(
            EntryContent::validate(None, "  \n "),
            Err(ThanklyError::BlankEntry)
        );
    }

    #[test]
    fn test_title_only_entry_is_allowed() {
        let content = EntryContent::validate(Some("Family"), "").unwrap();
        assert_eq!(content.title.as_deref(), Some("Family"));
    }

    #[test]
    fn test_length_limits_count_characters() {
        let ok = "é".repeat(MAX_TEXT_CHARS);
        assert!(EntryContent::validate(None, &ok).is_ok());
        let too_long = "é".repeat(MAX_TEXT_CHARS + 1);
        assert!(matches!(
            EntryContent::validate(None, &too_long),
            Err(ThanklyError::TooLong { field: "text", .. })
        ));
        assert!(matches!(
            EntryContent::validate(Some(&"t".repeat(MAX_TITLE_CHARS + 1)), "x"),
            Err(ThanklyError::TooLong { field: "title", .. })
        ));
    }

    #[test]
    fn test_date_serializes_as_day() {
        let entry = Appreciation {
            id: 1,
            title: None,
            text: "tea".into(),
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-02-29");
        assert!(json.get("title").is_none());
    }
}
