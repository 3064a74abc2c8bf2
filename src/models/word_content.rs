//! Learner-facing text of a vocabulary word. Only `word` and `translation` are
//! required; everything else is optional enrichment from content generation.
//! Keys stay in the generator's snake_case so the web client reads them back.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WordContent {
    /// For nouns this includes the article, e.g. "der Apfel".
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<WordPart>,
    #[serde(default, alias = "simpleDefinition")]
    pub simple_definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<Mnemonic>,
    #[serde(default, alias = "exampleSentences")]
    pub example_sentences: Vec<ExampleSentence>,
    #[serde(default, alias = "relatedWords", skip_serializing_if = "Vec::is_empty")]
    pub related_words: Vec<RelatedWord>,
    /// CEFR level such as "A1" or "B2".
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordPart {
    pub part: String,
    pub meaning: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mnemonic {
    pub story: String,
    pub emoji: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExampleSentence {
    /// Sentence in the language being learned.
    #[serde(rename = "de", alias = "target")]
    pub target: String,
    #[serde(rename = "en", alias = "english")]
    pub english: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedWord {
    pub word: String,
    pub meaning: String,
}

impl WordContent {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_content_creation() {
        let content = WordContent::new("der Apfel", "apple");

        assert_eq!(content.word, "der Apfel");
        assert_eq!(content.translation, "apple");
        assert!(content.gender.is_none());
        assert!(content.tags.is_empty());
    }

    #[test]
    fn test_accepts_generated_snake_case_fields() {
        let json = r#"{
            "word": "das Netzwerk",
            "translation": "network",
            "gender": "das",
            "plural": "die Netzwerke",
            "simple_definition": "a group of connected things",
            "mnemonic": { "story": "A net that works.", "emoji": "🕸️" },
            "example_sentences": [{ "de": "Das Netzwerk ist langsam.", "en": "The network is slow." }],
            "difficulty": "B1",
            "tags": ["technology"]
        }"#;

        let content: WordContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.gender.as_deref(), Some("das"));
        assert_eq!(content.simple_definition, "a group of connected things");
        assert_eq!(content.example_sentences[0].target, "Das Netzwerk ist langsam.");
        assert_eq!(content.example_sentences[0].english, "The network is slow.");
        assert_eq!(content.mnemonic.unwrap().emoji, "🕸️");
    }
}
