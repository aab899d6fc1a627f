pub mod choice;
pub mod codec;
pub mod error;
pub mod longest;
pub mod netgen;
pub mod quiz;
pub mod subnet;

pub use error::{NetError, NetResult};
pub use netgen::NetworkEntry;
pub use quiz::{generate_quiz_question, QuestionKind, QuizQuestion};
