//! 批改服务 - 业务能力层
//!
//! 只负责"批改一道开放题"能力

use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::error::LlmError;
use crate::services::llm_service::ChatModel;
use crate::services::prompt_builder::build_grading_prompt;

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*Status\W*:?\W*\s*\[?\s*(partially correct|partial|incorrect|correct)")
        .expect("状态行正则无效")
});

static FEEDBACK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Feedback\W*:\W*\s*(?P<feedback>.*)\z").expect("反馈行正则无效")
});

/// 批改结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStatus {
    Correct,
    Partial,
    Incorrect,
    /// 回复中没有可识别的状态行
    Unknown,
}

impl GradeStatus {
    pub fn label(self) -> &'static str {
        match self {
            GradeStatus::Correct => "Correct",
            GradeStatus::Partial => "Partial",
            GradeStatus::Incorrect => "Incorrect",
            GradeStatus::Unknown => "Unknown",
        }
    }
}

/// 老师的批改反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingFeedback {
    pub status: GradeStatus,
    /// `Feedback:` 之后的内容；没有该行时为整段回复
    pub feedback: String,
    /// 模型原始回复
    pub raw: String,
}

impl GradingFeedback {
    /// 从模型回复中提取状态和反馈
    pub fn from_reply(reply: &str) -> Self {
        let status = STATUS_LINE
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| match m.as_str().to_lowercase().as_str() {
                "correct" => GradeStatus::Correct,
                "incorrect" => GradeStatus::Incorrect,
                _ => GradeStatus::Partial,
            })
            .unwrap_or(GradeStatus::Unknown);

        let feedback = FEEDBACK_LINE
            .captures(reply)
            .and_then(|caps| caps.name("feedback"))
            .map(|m| {
                m.as_str()
                    .trim()
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .trim()
                    .to_string()
            })
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| reply.trim().to_string());

        Self {
            status,
            feedback,
            raw: reply.to_string(),
        }
    }
}

/// 批改服务
pub struct GradingService<'a, M: ChatModel> {
    model: &'a M,
}

impl<'a, M: ChatModel> GradingService<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// 批改学生答案
    ///
    /// 学生答案为空时不调用模型，直接返回错误
    pub async fn grade(
        &self,
        question: &str,
        model_answer: &str,
        student_answer: &str,
    ) -> Result<(GradingFeedback, u64)> {
        let student_answer = student_answer.trim();
        if student_answer.is_empty() {
            return Err(LlmError::EmptyStudentAnswer.into());
        }

        info!("👩‍🏫 AI 老师正在批改答案...");

        let prompt = build_grading_prompt(question, model_answer, student_answer);
        let reply = self.model.send_to_llm(&prompt, None).await?;

        let feedback = GradingFeedback::from_reply(&reply.content);
        debug!("批改结论: {}", feedback.status.label());

        Ok((feedback, reply.total_tokens))
    }
}
