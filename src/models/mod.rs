pub mod intake_session;
pub mod quality;
pub mod quality_policy;
pub mod sm2;
pub mod vocabulary_item;
pub mod word_content;

pub use intake_session::IntakeSession;
pub use quality::Quality;
pub use quality_policy::{MatchingOutcome, MoveCountPolicy, QualityPolicy, SelfAssessment, SelfRating};
pub use vocabulary_item::{NewWord, ReviewState, SrsState, Status, VocabularyItem};
pub use word_content::{ExampleSentence, Mnemonic, RelatedWord, WordContent, WordPart};
