//! JSON import/export for the card list and the progress map.
//! The progress file is an object keyed by card id; each value is a
//! `ScheduleState` with camelCase field names.

use crate::error::Result;
use crate::models::{Card, StateMap};
use log::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Exports cards to a JSON file at the specified path.
pub fn export_cards_to_path(cards: &[Card], path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(cards)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!("Exported {} cards to {:?}", cards.len(), path);
    Ok(())
}

/// Imports cards from a JSON array. Every card must pass validation.
pub fn import_cards(path: &Path) -> Result<Vec<Card>> {
    let contents = fs::read_to_string(path)?;
    let cards: Vec<Card> = serde_json::from_str(&contents)?;
    for card in &cards {
        card.validate()?;
    }
    info!("Imported {} cards from {:?}", cards.len(), path);
    Ok(cards)
}

pub fn export_progress_to_path(progress: &StateMap, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(progress)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!("Exported progress for {} cards to {:?}", progress.len(), path);
    Ok(())
}

pub fn import_progress(path: &Path) -> Result<StateMap> {
    let contents = fs::read_to_string(path)?;
    let progress: StateMap = serde_json::from_str(&contents)?;
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rating, SchedulerConfig, default_cards};
    use crate::scheduler::{rate, reconcile};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_export_and_import_cards() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let cards = default_cards();

        export_cards_to_path(&cards, &path).unwrap();
        assert!(fs::metadata(&path).is_ok(), "File should exist");

        let imported = import_cards(&path).unwrap();
        assert_eq!(imported, cards);
    }

    #[test]
    fn test_import_cards_from_hand_written_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        fs::write(
            &path,
            r#"[
  {
    "id": "c42",
    "sentence": "La sala está llena de gente.",
    "boldWord": "sala",
    "translation": "The room is full of people."
  }
]"#,
        )
        .unwrap();

        let cards = import_cards(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "c42");
        assert_eq!(cards[0].bold_word, "sala");
    }

    #[test]
    fn test_import_cards_rejects_blank_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        fs::write(
            &path,
            r#"[{ "id": "c1", "sentence": "", "boldWord": "x", "translation": "y" }]"#,
        )
        .unwrap();
        assert!(import_cards(&path).is_err());
    }

    #[test]
    fn test_import_nonexistent_file() {
        let dir = tempdir().unwrap();
        assert!(import_cards(&dir.path().join("nonexistent.json")).is_err());
    }

    #[test]
    fn test_progress_file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let cards = default_cards();
        let mut progress = reconcile(&cards[..2], None, 1000);
        let rated = rate(&progress["c1"], Rating::Good, 1000, &SchedulerConfig::default());
        progress.insert("c1".to_string(), rated);

        export_progress_to_path(&progress, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["c1"]["status"], "review");
        assert_eq!(value["c1"]["repetitionCount"], 1);
        assert_eq!(value["c2"]["dueAt"], 1000);
        assert_eq!(value["c2"]["easeFactor"], 2.5);

        assert_eq!(import_progress(&path).unwrap(), progress);
    }
}
