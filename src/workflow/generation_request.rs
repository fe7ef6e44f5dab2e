//! 生成请求上下文
//!
//! 封装"这次要生成什么题"这一信息

use std::fmt::Display;

use crate::models::{QuestionType, Subject};

/// 生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub subject: Subject,

    /// 主题（标准写法）
    pub topic: String,

    pub question_type: QuestionType,

    /// 需要生成的题目数量
    pub count: usize,
}

impl GenerationRequest {
    pub fn new(
        subject: Subject,
        topic: impl Into<String>,
        question_type: QuestionType,
        count: usize,
    ) -> Self {
        Self {
            subject,
            topic: topic.into(),
            question_type,
            count,
        }
    }
}

impl Display for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[科目 {} 主题 {} 题型 {} 数量 {}]",
            self.subject, self.topic, self.question_type, self.count
        )
    }
}
