use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::Subject;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 生成题目时的采样温度
    pub llm_temperature: f32,
    /// 单次回复的最大 token 数
    pub llm_max_tokens: u32,
    // --- 参考题库配置 ---
    pub math_reference_file: PathBuf,
    pub science_reference_file: PathBuf,
    /// 参考题库中存放题干的列名
    pub question_column: String,
    /// 每次运行从题库中抽取的参考题数量
    pub reference_sample_size: usize,
    // --- 生成循环配置 ---
    pub max_retries: usize,
    /// 每次尝试前的等待时间（毫秒）
    pub attempt_delay_ms: u64,
    /// 随机种子，设置后抽样结果可复现
    pub sample_seed: Option<u64>,
    /// 解析失败的原始回复写入此文件
    pub unparsed_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 8192,
            math_reference_file: PathBuf::from("Math.toml"),
            science_reference_file: PathBuf::from("Science.toml"),
            question_column: "Question Text".to_string(),
            reference_sample_size: 50,
            max_retries: 5,
            attempt_delay_ms: 3000,
            sample_seed: None,
            unparsed_log_file: "unparsed.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let var = |name: &str| std::env::var(name).ok();

        Self {
            llm_api_key: var("LLM_API_KEY")
                .or_else(|| var("GOOGLE_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: parse_or(var("LLM_TEMPERATURE"), default.llm_temperature),
            llm_max_tokens: parse_or(var("LLM_MAX_TOKENS"), default.llm_max_tokens),
            math_reference_file: var("MATH_REFERENCE_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.math_reference_file),
            science_reference_file: var("SCIENCE_REFERENCE_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.science_reference_file),
            question_column: var("QUESTION_COLUMN").unwrap_or(default.question_column),
            reference_sample_size: parse_or(
                var("REFERENCE_SAMPLE_SIZE"),
                default.reference_sample_size,
            ),
            max_retries: parse_or(var("MAX_RETRIES"), default.max_retries),
            attempt_delay_ms: parse_or(var("ATTEMPT_DELAY_MS"), default.attempt_delay_ms),
            sample_seed: var("SAMPLE_SEED").and_then(|v| v.trim().parse().ok()),
            unparsed_log_file: var("UNPARSED_LOG_FILE").unwrap_or(default.unparsed_log_file),
            verbose_logging: parse_or(var("VERBOSE_LOGGING"), default.verbose_logging),
        }
    }

    /// 校验配置，在发起任何 API 调用之前执行
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_RETRIES",
                value: self.max_retries.to_string(),
                reason: "至少需要尝试一次",
            });
        }
        if self.reference_sample_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "REFERENCE_SAMPLE_SIZE",
                value: self.reference_sample_size.to_string(),
                reason: "至少需要一道参考题",
            });
        }
        Ok(())
    }

    /// 科目对应的参考题库文件
    pub fn reference_file(&self, subject: Subject) -> &PathBuf {
        match subject {
            Subject::Math => &self.math_reference_file,
            Subject::Science => &self.science_reference_file,
        }
    }

    pub fn attempt_delay(&self) -> Duration {
        Duration::from_millis(self.attempt_delay_ms)
    }
}

/// 解析环境变量的值；未设置或无法解析时使用默认值
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
