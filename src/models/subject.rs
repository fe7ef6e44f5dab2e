use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 科目枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// 数学
    Math,
    /// 科学
    Science,
}

/// 科目别名表（小写）
static SUBJECT_ALIASES: phf::Map<&'static str, Subject> = phf_map! {
    "math" => Subject::Math,
    "maths" => Subject::Math,
    "mathematics" => Subject::Math,
    "数学" => Subject::Math,
    "science" => Subject::Science,
    "sci" => Subject::Science,
    "科学" => Subject::Science,
};

const MATH_TOPICS: &[&str] = &[
    "Fractions",
    "Ratio",
    "Percentage",
    "Algebra",
    "Geometry",
    "Speed",
    "Volume",
];

const SCIENCE_TOPICS: &[&str] = &["Diversity", "Cycles", "Systems", "Interactions", "Energy"];

impl Subject {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Science => "Science",
        }
    }

    /// 小写键名，用于日志和提示词
    pub fn key(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Science => "science",
        }
    }

    /// 题目难度描述
    pub fn difficulty_text(self) -> &'static str {
        match self {
            Subject::Math | Subject::Science => "Challenging (PSLE Standard)",
        }
    }

    /// 该科目可选的主题
    pub fn topics(self) -> &'static [&'static str] {
        match self {
            Subject::Math => MATH_TOPICS,
            Subject::Science => SCIENCE_TOPICS,
        }
    }

    /// 默认主题（主题列表中的第一个）
    pub fn default_topic(self) -> &'static str {
        self.topics()[0]
    }

    /// 按名称查找主题（忽略大小写），返回标准写法
    pub fn find_topic(self, topic: &str) -> Option<&'static str> {
        let topic = topic.trim();
        self.topics()
            .iter()
            .copied()
            .find(|candidate| candidate.eq_ignore_ascii_case(topic))
    }

    /// 从别名解析科目
    pub fn find(s: &str) -> Option<Self> {
        SUBJECT_ALIASES.get(s.trim().to_lowercase().as_str()).copied()
    }
}

impl std::str::FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::find(s).ok_or_else(|| format!("未知科目: {} (可选: math, science)", s))
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
