//! A card is a sentence with one highlighted word and its translation.
//! The scheduler only looks at the identifier; the rest is learning content.
use crate::error::FlashcardsError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Anything the scheduler can track. Only the identifier matters.
pub trait Item {
    fn id(&self) -> &str;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub sentence: String,
    pub bold_word: String,
    pub translation: String,
}

static NEXT_ID_SUFFIX: AtomicU64 = AtomicU64::new(0);

impl Card {
    /// Creates a card with a fresh identifier of the form `c_<millis>_<n>`.
    pub fn new(
        sentence: impl Into<String>,
        bold_word: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            id: fresh_id(),
            sentence: sentence.into(),
            bold_word: bold_word.into(),
            translation: translation.into(),
        }
    }

    /// Rejects cards with a blank sentence, bold word or translation.
    pub fn validate(&self) -> Result<(), FlashcardsError> {
        if self.sentence.trim().is_empty() {
            return Err(FlashcardsError::InvalidCard("sentence is required".into()));
        }
        if self.bold_word.trim().is_empty() {
            return Err(FlashcardsError::InvalidCard("bold word is required".into()));
        }
        if self.translation.trim().is_empty() {
            return Err(FlashcardsError::InvalidCard("translation is required".into()));
        }
        Ok(())
    }

    /// Splits the sentence around the first occurrence of the bold word.
    /// Returns `None` when the word does not appear literally.
    pub fn highlight(&self) -> Option<(&str, &str, &str)> {
        let word = self.bold_word.trim();
        if word.is_empty() {
            return None;
        }
        let start = self.sentence.find(word)?;
        let end = start + word.len();
        Some((
            &self.sentence[..start],
            &self.sentence[start..end],
            &self.sentence[end..],
        ))
    }
}

impl Item for Card {
    fn id(&self) -> &str {
        &self.id
    }
}

fn fresh_id() -> String {
    let millis = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix = NEXT_ID_SUFFIX.fetch_add(1, Ordering::Relaxed);
    format!("c_{}_{}", millis, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cards_get_distinct_ids() {
        let a = Card::new("Hola", "Hola", "Hello");
        let b = Card::new("Hola", "Hola", "Hello");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("c_"));
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let card = Card::new("  ", "mesa", "table");
        assert!(matches!(card.validate(), Err(FlashcardsError::InvalidCard(_))));

        let card = Card::new("La mesa", "", "The table");
        assert!(card.validate().is_err());

        let card = Card::new("La mesa", "mesa", " ");
        assert!(card.validate().is_err());

        let card = Card::new("La mesa", "mesa", "The table");
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_highlight_splits_sentence() {
        let card = Card::new("No encuentro mis anteojos.", "anteojos", "I cannot find my glasses.");
        let (before, word, after) = card.highlight().unwrap();
        assert_eq!(before, "No encuentro mis ");
        assert_eq!(word, "anteojos");
        assert_eq!(after, ".");
    }

    #[test]
    fn test_highlight_missing_word() {
        let card = Card::new("Las raíces yacen bajo la tierra.", "yacer", "The roots lie beneath the ground.");
        assert!(card.highlight().is_none());
    }

    #[test]
    fn test_card_json_uses_camel_case() {
        let card = Card {
            id: "c1".to_string(),
            sentence: "s".to_string(),
            bold_word: "b".to_string(),
            translation: "t".to_string(),
        };
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("\"boldWord\":\"b\""));
    }
}
