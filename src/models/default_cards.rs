//! Built-in starter deck used on first launch and by "Reset to defaults".
use super::Card;

const DEFAULT_CARDS: [(&str, &str, &str, &str); 10] = [
    ("c1", "Voy a quitar el polvo de la mesa.", "quitar", "I am going to remove the dust from the table."),
    ("c2", "No encuentro mis anteojos.", "anteojos", "I cannot find my glasses."),
    ("c3", "El tamaño de la caja es perfecto.", "tamaño", "The size of the box is perfect."),
    ("c4", "Camina por el pasillo en silencio.", "pasillo", "Walk through the hallway quietly."),
    ("c5", "¿Podemos pedir la cuenta, por favor?", "la cuenta", "Can we ask for the bill, please?"),
    ("c6", "Voy a pedir ayuda si la necesito.", "pedir", "I will ask for help if I need it."),
    ("c7", "La sala está llena de gente.", "sala", "The room is full of people."),
    ("c8", "Intento acordarme de los detalles importantes.", "acordarme", "I usually try to remember the important details."),
    ("c9", "Las raíces yacen bajo la tierra.", "yacer", "The roots lie beneath the ground."),
    ("c10", "Los niños pueden tener miedo a la oscuridad.", "tener miedo", "Children can be afraid of the dark."),
];

pub fn default_cards() -> Vec<Card> {
    DEFAULT_CARDS
        .iter()
        .map(|(id, sentence, bold_word, translation)| Card {
            id: id.to_string(),
            sentence: sentence.to_string(),
            bold_word: bold_word.to_string(),
            translation: translation.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cards_are_valid_and_unique() {
        let cards = default_cards();
        assert_eq!(cards.len(), 10);
        for card in &cards {
            assert!(card.validate().is_ok(), "card {} should be valid", card.id);
        }
        let mut ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
