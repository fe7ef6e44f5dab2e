//! # AI Question Generator
//!
//! 一个用 LLM 生成 PSLE 风格练习题并在终端答题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 科目、题型、生成的题目、参考题库及其加载器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `LlmService` - 调用模型能力（`ChatModel` trait）
//! - `prompt_builder` - 构建生成 / 批改提示词
//! - `question_parser` - 正则解析模型回复
//! - `GradingService` - 批改开放题
//! - `UnparsedWriter` - 记录无法解析的回复
//!
//! ### ③ 流程层（Workflow）
//! - `GenerationFlow` - 抽样 → 提示词 → 调用 → 解析 → 重试
//! - `QuizSession` - 答题会话状态（题号、核对、反馈）
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 一次运行的完整生命周期
//! - `QuizConsole` - 终端答题界面

pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use cli::Cli;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{GeneratedQuestion, QuestionType, Subject};
pub use orchestrator::App;
pub use services::{ChatModel, LlmReply, LlmService};
pub use workflow::{GenerationFlow, GenerationOutcome, GenerationRequest, QuizSession};
