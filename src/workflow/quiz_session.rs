//! 答题会话 - 流程层
//!
//! 保存一次生成之后的答题状态：当前题号、是否已核对、批改反馈和每题结果。
//! 换题时清空核对状态和反馈。

use crate::models::{GeneratedQuestion, McqQuestion, OptionLetter};
use crate::services::{GradeStatus, GradingFeedback};

/// 单题作答结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOutcome {
    Correct,
    Partial,
    Incorrect,
    /// 已批改但无法判断结论
    Ungraded,
}

/// 选择题核对结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqVerdict {
    pub picked: OptionLetter,
    /// 答案文本中找不到 A-D 时为 None
    pub correct: Option<OptionLetter>,
    pub reasoning: String,
}

impl McqVerdict {
    pub fn is_correct(&self) -> bool {
        self.correct == Some(self.picked)
    }
}

/// 会话统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub partial: usize,
}

/// 答题会话
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<GeneratedQuestion>,
    current_index: usize,
    answer_checked: bool,
    grading_feedback: Option<GradingFeedback>,
    outcomes: Vec<Option<QuestionOutcome>>,
    tokens_used: u64,
}

impl QuizSession {
    pub fn new(questions: Vec<GeneratedQuestion>, tokens_used: u64) -> Self {
        let outcomes = vec![None; questions.len()];
        Self {
            questions,
            current_index: 0,
            answer_checked: false,
            grading_feedback: None,
            outcomes,
            tokens_used,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 当前题号（从 0 开始）；越界时回到第一题
    pub fn current_index(&self) -> usize {
        if self.current_index >= self.questions.len() {
            0
        } else {
            self.current_index
        }
    }

    pub fn current(&self) -> Option<&GeneratedQuestion> {
        let index = self.current_index();
        self.questions.get(index)
    }

    pub fn has_next(&self) -> bool {
        self.current_index() + 1 < self.questions.len()
    }

    pub fn has_prev(&self) -> bool {
        self.current_index() > 0
    }

    /// 下一题；已在最后一题时不移动并返回 false
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_index = self.current_index() + 1;
        self.reset_answer_state();
        true
    }

    /// 上一题；已在第一题时不移动并返回 false
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_index = self.current_index() - 1;
        self.reset_answer_state();
        true
    }

    pub fn answer_checked(&self) -> bool {
        self.answer_checked
    }

    pub fn grading_feedback(&self) -> Option<&GradingFeedback> {
        self.grading_feedback.as_ref()
    }

    pub fn tokens_used(&self) -> u64 {
        self.tokens_used
    }

    pub fn add_tokens(&mut self, tokens: u64) {
        self.tokens_used += tokens;
    }

    /// 核对当前选择题；当前题不是选择题时返回 None
    pub fn check_mcq(&mut self, picked: OptionLetter) -> Option<McqVerdict> {
        let index = self.current_index();
        let verdict = match self.questions.get(index)? {
            GeneratedQuestion::Mcq(q) => verdict_for(q, picked),
            GeneratedQuestion::OpenEnded(_) => return None,
        };

        self.answer_checked = true;
        self.outcomes[index] = Some(if verdict.is_correct() {
            QuestionOutcome::Correct
        } else {
            QuestionOutcome::Incorrect
        });

        Some(verdict)
    }

    /// 保存当前开放题的批改反馈
    pub fn record_feedback(&mut self, feedback: GradingFeedback) {
        let index = self.current_index();
        if index >= self.outcomes.len() {
            return;
        }

        self.outcomes[index] = Some(match feedback.status {
            GradeStatus::Correct => QuestionOutcome::Correct,
            GradeStatus::Partial => QuestionOutcome::Partial,
            GradeStatus::Incorrect => QuestionOutcome::Incorrect,
            GradeStatus::Unknown => QuestionOutcome::Ungraded,
        });
        self.grading_feedback = Some(feedback);
        self.answer_checked = true;
    }

    pub fn outcome(&self, index: usize) -> Option<QuestionOutcome> {
        self.outcomes.get(index).copied().flatten()
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary {
            total: self.questions.len(),
            ..Default::default()
        };
        for outcome in self.outcomes.iter().flatten() {
            summary.answered += 1;
            match outcome {
                QuestionOutcome::Correct => summary.correct += 1,
                QuestionOutcome::Partial => summary.partial += 1,
                QuestionOutcome::Incorrect | QuestionOutcome::Ungraded => {}
            }
        }
        summary
    }

    fn reset_answer_state(&mut self) {
        self.answer_checked = false;
        self.grading_feedback = None;
    }
}

fn verdict_for(question: &McqQuestion, picked: OptionLetter) -> McqVerdict {
    McqVerdict {
        picked,
        correct: question.correct_letter(),
        reasoning: question.reasoning.clone(),
    }
}
