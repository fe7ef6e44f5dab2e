use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::Subject;

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "Open-Ended")]
    OpenEnded,
}

impl QuestionType {
    /// 显示名称，同时用于提示词
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::OpenEnded => "Open-Ended",
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "mcq" | "multiple-choice" => Ok(QuestionType::Mcq),
            "open-ended" | "open" | "openended" => Ok(QuestionType::OpenEnded),
            _ => Err(format!("未知题型: {} (可选: mcq, open-ended)", s)),
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 选择题选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            _ => None,
        }
    }

    /// 解析用户输入，接受 `b`、`B)`、`(B)`、`B) 42` 等写法
    pub fn parse_choice(input: &str) -> Option<Self> {
        let trimmed = input.trim().trim_start_matches('(');
        let mut chars = trimmed.chars();
        let letter = Self::from_char(chars.next()?)?;
        match chars.next() {
            None => Some(letter),
            Some(c) if c == ')' || c == '.' || c.is_whitespace() => Some(letter),
            Some(_) => None,
        }
    }
}

impl std::fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 选择题的四个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl McqOptions {
    pub fn get(&self, letter: OptionLetter) -> &str {
        match letter {
            OptionLetter::A => &self.a,
            OptionLetter::B => &self.b,
            OptionLetter::C => &self.c,
            OptionLetter::D => &self.d,
        }
    }
}

/// 生成的选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    pub difficulty: String,
    pub topic: String,
    pub options: McqOptions,
    /// 模型给出的原始答案文本，例如 `(B)`
    pub answer: String,
    pub reasoning: String,
}

impl McqQuestion {
    /// 正确选项：答案文本中第一个独立出现的 A-D 字母
    pub fn correct_letter(&self) -> Option<OptionLetter> {
        let chars: Vec<char> = self.answer.chars().collect();
        chars.iter().enumerate().find_map(|(i, &c)| {
            let standalone_before = i == 0 || !chars[i - 1].is_alphabetic();
            let standalone_after = chars.get(i + 1).map_or(true, |n| !n.is_alphabetic());
            if standalone_before && standalone_after {
                OptionLetter::from_char(c)
            } else {
                None
            }
        })
    }
}

/// 生成的开放题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenEndedQuestion {
    pub question: String,
    pub difficulty: String,
    pub topic: String,
    /// 参考答案（包含评分关键词）
    pub answer: String,
}

/// 生成的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneratedQuestion {
    #[serde(rename = "MCQ")]
    Mcq(McqQuestion),
    #[serde(rename = "Open-Ended")]
    OpenEnded(OpenEndedQuestion),
}

impl GeneratedQuestion {
    pub fn question_type(&self) -> QuestionType {
        match self {
            GeneratedQuestion::Mcq(_) => QuestionType::Mcq,
            GeneratedQuestion::OpenEnded(_) => QuestionType::OpenEnded,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            GeneratedQuestion::Mcq(q) => &q.question,
            GeneratedQuestion::OpenEnded(q) => &q.question,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            GeneratedQuestion::Mcq(q) => &q.topic,
            GeneratedQuestion::OpenEnded(q) => &q.topic,
        }
    }

    pub fn difficulty(&self) -> &str {
        match self {
            GeneratedQuestion::Mcq(q) => &q.difficulty,
            GeneratedQuestion::OpenEnded(q) => &q.difficulty,
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            GeneratedQuestion::Mcq(q) => &q.answer,
            GeneratedQuestion::OpenEnded(q) => &q.answer,
        }
    }
}

/// 一次生成的完整结果，用于导出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSet {
    pub subject: Subject,
    pub topic: String,
    pub question_type: QuestionType,
    pub generated_at: DateTime<Local>,
    pub tokens_used: u64,
    pub questions: Vec<GeneratedQuestion>,
}
