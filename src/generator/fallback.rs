//! Offline sentence templates.
use super::{GeneratedSentence, SentenceGenerator};
use crate::error::Result;

const SPANISH: [&str; 5] = [
    "Me gusta la palabra \"{}\".",
    "\"{}\" es una palabra interesante.",
    "Aprendo \"{}\" en español.",
    "¿Puedes usar \"{}\" en una frase?",
    "\"{}\" significa algo importante.",
];

const FRENCH: [&str; 5] = [
    "J'aime le mot \"{}\".",
    "\"{}\" est un mot intéressant.",
    "J'apprends \"{}\" en français.",
    "Pouvez-vous utiliser \"{}\" dans une phrase?",
    "\"{}\" signifie quelque chose d'important.",
];

const GERMAN: [&str; 5] = [
    "Ich mag das Wort \"{}\".",
    "\"{}\" ist ein interessantes Wort.",
    "Ich lerne \"{}\" auf Deutsch.",
    "Kannst du \"{}\" in einem Satz verwenden?",
    "\"{}\" bedeutet etwas Wichtiges.",
];

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTemplateGenerator;

impl LocalTemplateGenerator {
    pub const CONFIDENCE: f32 = 0.6;

    fn templates(language: &str) -> &'static [&'static str; 5] {
        match language.to_ascii_lowercase().as_str() {
            "french" => &FRENCH,
            "german" => &GERMAN,
            _ => &SPANISH,
        }
    }

    pub fn sentence_for(word: &str, language: &str) -> GeneratedSentence {
        let templates = Self::templates(language);
        // Same word always picks the same template
        let index = word.chars().map(|c| c as usize).sum::<usize>() % templates.len();
        let sentence = templates[index].replace("{}", word);

        GeneratedSentence {
            translation: format!("[{} sentence: {}]", language, sentence),
            sentence,
            confidence: Self::CONFIDENCE,
        }
    }
}

impl SentenceGenerator for LocalTemplateGenerator {
    fn name(&self) -> &str {
        "Fallback (Local)"
    }

    fn generate(&self, word: &str, language: &str) -> Result<GeneratedSentence> {
        Ok(Self::sentence_for(word, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_contains_word() {
        let generator = LocalTemplateGenerator;
        for language in ["Spanish", "French", "German"] {
            let result = generator.generate("casa", language).unwrap();
            assert!(result.sentence.contains("\"casa\""));
            assert!(result.translation.starts_with(&format!("[{} sentence:", language)));
        }
    }

    #[test]
    fn test_unknown_language_uses_spanish() {
        let generator = LocalTemplateGenerator;
        let italian = generator.generate("casa", "Italian").unwrap();
        let spanish = generator.generate("casa", "Spanish").unwrap();
        assert_eq!(italian.sentence, spanish.sentence);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = LocalTemplateGenerator;
        assert_eq!(
            generator.generate("perro", "German").unwrap(),
            generator.generate("perro", "German").unwrap()
        );
    }
}
