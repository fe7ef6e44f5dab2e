//! 题目解析 - 业务能力层
//!
//! 把模型返回的纯文本块解析为结构化题目。
//!
//! 每个题目块以行首的 `[Reference: n]` 开头，一直延续到下一个行首标记或文本结尾。
//! 行内引用（如 `Like [Reference: 3], ...`）属于题目内容，不会切块。
//! 先按标记切块，再对每块做整块匹配，不完整的块直接跳过，
//! 不会和后面的块拼在一起。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{
    GeneratedQuestion, McqOptions, McqQuestion, OpenEndedQuestion, QuestionType,
};

static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*\[Reference:\s*\d+\]").expect("块标记正则无效")
});

static MCQ_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)\A[ \t]*\[Reference:\s*\d+\].*?\n\s*",
        r"Question:\s*(?P<question>.*?)\n\s*",
        r"Difficulty:\s*(?P<difficulty>.*?)\n\s*",
        r"Topic:\s*(?P<topic>.*?)\n\s*",
        r"A\)\s*(?P<a>.*?)\n\s*",
        r"B\)\s*(?P<b>.*?)\n\s*",
        r"C\)\s*(?P<c>.*?)\n\s*",
        r"D\)\s*(?P<d>.*?)\n\s*",
        r"Answer:\s*(?P<answer>.*?)\n\s*",
        r"Reasoning:\s*(?P<reasoning>.*?)\s*\z",
    ))
    .expect("选择题正则无效")
});

static OPEN_ENDED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)\A[ \t]*\[Reference:\s*\d+\].*?\n\s*",
        r"Question:\s*(?P<question>.*?)\n\s*",
        r"Difficulty:\s*(?P<difficulty>.*?)\n\s*",
        r"Topic:\s*(?P<topic>.*?)\n\s*",
        r"Answer:\s*(?P<answer>.*?)\s*\z",
    ))
    .expect("开放题正则无效")
});

/// 解析模型回复
///
/// 返回所有格式完整的题目，可能为空
pub fn parse_generated_questions(
    text: &str,
    question_type: QuestionType,
) -> Vec<GeneratedQuestion> {
    let normalized = normalize(text);

    let questions: Vec<GeneratedQuestion> = split_blocks(&normalized)
        .into_iter()
        .filter_map(|block| match question_type {
            QuestionType::Mcq => parse_mcq_block(block),
            QuestionType::OpenEnded => parse_open_ended_block(block),
        })
        .collect();

    debug!(
        "解析完成: {} 个 {} 题目",
        questions.len(),
        question_type.label()
    );

    questions
}

/// 统一换行并去掉 markdown 粗体标记
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace("**", "")
}

/// 按行首的 `[Reference: n]` 标记切块，标记之前的内容丢弃
fn split_blocks(text: &str) -> Vec<&str> {
    let starts: Vec<usize> = BLOCK_MARKER.find_iter(text).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

fn parse_mcq_block(block: &str) -> Option<GeneratedQuestion> {
    let caps = MCQ_BLOCK.captures(block)?;
    let field = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    Some(GeneratedQuestion::Mcq(McqQuestion {
        question: field("question"),
        difficulty: field("difficulty"),
        topic: field("topic"),
        options: McqOptions {
            a: field("a"),
            b: field("b"),
            c: field("c"),
            d: field("d"),
        },
        answer: field("answer"),
        reasoning: field("reasoning"),
    }))
}

fn parse_open_ended_block(block: &str) -> Option<GeneratedQuestion> {
    let caps = OPEN_ENDED_BLOCK.captures(block)?;
    let field = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    Some(GeneratedQuestion::OpenEnded(OpenEndedQuestion {
        question: field("question"),
        difficulty: field("difficulty"),
        topic: field("topic"),
        answer: field("answer"),
    }))
}
