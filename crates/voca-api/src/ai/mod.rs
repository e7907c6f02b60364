pub mod boundary;
pub mod evaluation;
pub mod model;
pub mod openai;
pub mod translation;

pub use boundary::AiBoundary;
pub use evaluation::AnswerEvaluation;
pub use model::{AiError, CompletionRequest, LanguageModel};
pub use openai::OpenAiModel;
pub use translation::{CorrectionType, WordToValidate, WordValidation};
