//! Turning a pasted word list into cards.
use super::{SentenceGenerator, generate_or_fallback};
use crate::models::Card;
use log::info;

/// Splits on newlines, commas and semicolons, trims, drops blanks and keeps
/// the first occurrence of each word.
pub fn parse_word_list(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in text.split(['\n', ',', ';']).map(str::trim) {
        if !word.is_empty() && !words.iter().any(|w| w == word) {
            words.push(word.to_string());
        }
    }
    words
}

/// One card per word. A word the generator fails on still gets a card from
/// the local templates.
pub fn generate_cards(
    words: &[String],
    language: &str,
    generator: &dyn SentenceGenerator,
) -> Vec<Card> {
    let cards: Vec<Card> = words
        .iter()
        .map(|word| {
            let generated = generate_or_fallback(generator, word, language);
            Card::new(generated.sentence, word.as_str(), generated.translation)
        })
        .collect();
    info!("Generated {} cards with {}", cards.len(), generator.name());
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FlashcardsError, Result};
    use crate::generator::{GeneratedSentence, LocalTemplateGenerator};

    #[test]
    fn test_parse_word_list() {
        let words = parse_word_list("casa, perro;\n gato\n\ncasa ,  ; mesa");
        assert_eq!(words, vec!["casa", "perro", "gato", "mesa"]);
    }

    #[test]
    fn test_parse_blank_input() {
        assert!(parse_word_list(" \n,;, ").is_empty());
    }

    #[test]
    fn test_generate_cards_with_local_templates() {
        let words = parse_word_list("casa, perro");
        let cards = generate_cards(&words, "Spanish", &LocalTemplateGenerator);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].bold_word, "casa");
        assert!(cards[0].sentence.contains("casa"));
        assert!(cards.iter().all(|c| c.validate().is_ok()));
        assert_ne!(cards[0].id, cards[1].id);
    }

    struct Unreliable;

    impl SentenceGenerator for Unreliable {
        fn name(&self) -> &str {
            "unreliable"
        }

        fn generate(&self, word: &str, _language: &str) -> Result<GeneratedSentence> {
            if word == "bad" {
                return Err(FlashcardsError::Generation("rate limited".into()));
            }
            Ok(GeneratedSentence {
                sentence: format!("Una frase con {}.", word),
                translation: format!("A sentence with {}.", word),
                confidence: 0.9,
            })
        }
    }

    #[test]
    fn test_failed_word_still_produces_card() {
        crate::logging::initialize_for_tests();
        let words = vec!["good".to_string(), "bad".to_string()];
        let cards = generate_cards(&words, "French", &Unreliable);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].sentence, "Una frase con good.");
        assert!(cards[1].sentence.contains("\"bad\""));
    }
}
