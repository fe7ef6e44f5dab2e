pub mod generation_flow;
pub mod generation_request;
pub mod quiz_session;

pub use generation_flow::{GenerationFlow, GenerationOutcome};
pub use generation_request::GenerationRequest;
pub use quiz_session::{McqVerdict, QuestionOutcome, QuizSession, SessionSummary};
