use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 参考题库错误
    #[error("参考题库错误: {0}")]
    Reference(#[from] ReferenceError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未提供 API 密钥
    #[error("Missing API Key (请设置 LLM_API_KEY 或 GOOGLE_API_KEY)")]
    MissingApiKey,
    /// 数值配置无效
    #[error("配置项 {name} 的值 {value} 无效: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    /// 主题不属于所选科目
    #[error("主题 '{topic}' 不属于科目 {subject}，可选: {available}")]
    UnknownTopic {
        topic: String,
        subject: String,
        available: String,
    },
}

/// 参考题库错误
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// 文件不存在
    #[error("The file '{path}' was not found")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取参考题库失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("解析参考题库失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 缺少题目列
    #[error("参考题库 {path} 必须包含名为 '{column}' 的列")]
    MissingColumn { path: String, column: String },
    /// 没有任何有效题目
    #[error("No questions found in the column '{column}' ({path})")]
    Empty { path: String, column: String },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 学生答案为空
    #[error("Please type an answer first.")]
    EmptyStudentAnswer,
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 创建文件操作错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offending_input() {
        let err = ReferenceError::MissingColumn {
            path: "Math.toml".to_string(),
            column: "Question Text".to_string(),
        };
        assert!(err.to_string().contains("'Question Text'"));

        let err: AppError = ConfigError::MissingApiKey.into();
        assert!(err.to_string().contains("Missing API Key"));
    }
}
