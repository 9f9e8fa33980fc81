//! Example-sentence generation for new cards.
//!
//! Providers are injected through the `SentenceGenerator` trait. The local
//! template generator always works and is what `generate_or_fallback`
//! degrades to when another provider fails.

pub mod bulk;
pub mod fallback;

pub use bulk::{generate_cards, parse_word_list};
pub use fallback::LocalTemplateGenerator;

use crate::error::Result;
use log::warn;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedSentence {
    pub sentence: String,
    pub translation: String,
    /// Provider's own estimate, 0.0 to 1.0.
    pub confidence: f32,
}

pub trait SentenceGenerator {
    /// Human-readable provider name, shown in the UI.
    fn name(&self) -> &str;

    fn generate(&self, word: &str, language: &str) -> Result<GeneratedSentence>;
}

/// Asks `generator` for a sentence and falls back to the local templates
/// when it fails, so the caller always gets something to edit.
pub fn generate_or_fallback(
    generator: &dyn SentenceGenerator,
    word: &str,
    language: &str,
) -> GeneratedSentence {
    match generator.generate(word, language) {
        Ok(sentence) => sentence,
        Err(err) => {
            warn!(
                "{} failed for '{}': {}; using local templates",
                generator.name(),
                word,
                err
            );
            LocalTemplateGenerator::sentence_for(word, language)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlashcardsError;

    struct Failing;

    impl SentenceGenerator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn generate(&self, _word: &str, _language: &str) -> Result<GeneratedSentence> {
            Err(FlashcardsError::Generation("service unavailable".into()))
        }
    }

    struct Fixed;

    impl SentenceGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn generate(&self, word: &str, _language: &str) -> Result<GeneratedSentence> {
            Ok(GeneratedSentence {
                sentence: format!("Fixed {}", word),
                translation: "fixed".to_string(),
                confidence: 0.9,
            })
        }
    }

    #[test]
    fn test_fallback_used_when_provider_fails() {
        crate::logging::initialize_for_tests();
        let result = generate_or_fallback(&Failing, "mesa", "Spanish");
        assert!(result.sentence.contains("mesa"));
        assert_eq!(result.confidence, LocalTemplateGenerator::CONFIDENCE);
    }

    #[test]
    fn test_provider_result_is_kept() {
        let result = generate_or_fallback(&Fixed, "mesa", "Spanish");
        assert_eq!(result.sentence, "Fixed mesa");
        assert_eq!(result.confidence, 0.9);
    }
}
