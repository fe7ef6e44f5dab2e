pub mod grading_service;
pub mod llm_service;
pub mod prompt_builder;
pub mod question_parser;
pub mod set_exporter;
pub mod unparsed_writer;

pub use grading_service::{GradeStatus, GradingFeedback, GradingService};
pub use llm_service::{ChatModel, LlmReply, LlmService};
pub use prompt_builder::{build_generation_prompt, build_grading_prompt, GenerationPrompt};
pub use question_parser::parse_generated_questions;
pub use set_exporter::{export_generated_set, render_generated_set, ExportFormat};
pub use unparsed_writer::UnparsedWriter;
