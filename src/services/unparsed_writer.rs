//! 解析失败记录服务 - 业务能力层
//!
//! 只负责"把无法解析的模型回复写入文件"能力，不关心流程

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::workflow::GenerationRequest;

/// 解析失败记录服务
///
/// 职责：
/// - 把解析出 0 道题的原始回复追加到文件，便于调整提示词和正则
/// - 只处理单次回复
pub struct UnparsedWriter {
    file_path: String,
}

impl UnparsedWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.file_path
    }

    /// 追加一条记录
    ///
    /// # 参数
    /// - `request`: 本次生成请求
    /// - `attempt`: 第几次尝试（从 1 开始）
    /// - `reply`: 模型原始回复
    pub fn write(&self, request: &GenerationRequest, attempt: usize, reply: &str) -> Result<()> {
        debug!(
            "写入解析失败记录: {} | 第 {} 次尝试 | 回复长度: {}",
            request,
            attempt,
            reply.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .with_context(|| format!("无法打开文件: {}", self.file_path))?;

        let entry = format!(
            "{}\n{} | {} | 第 {} 次尝试\n{}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            request,
            attempt,
            "-".repeat(60),
            reply.trim_end()
        );

        file.write_all(entry.as_bytes())
            .with_context(|| format!("无法写入文件: {}", self.file_path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionType, Subject};

    #[test]
    fn test_write_appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unparsed.txt");
        let writer = UnparsedWriter::with_path(path.to_string_lossy());
        let request = GenerationRequest::new(Subject::Math, "Ratio", QuestionType::Mcq, 3);

        writer.write(&request, 1, "Sorry, I cannot help.").unwrap();
        writer.write(&request, 2, "Still no blocks.").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("第 1 次尝试\n"));
        assert!(content.contains("Sorry, I cannot help."));
        assert!(content.contains("Still no blocks."));
        assert_eq!(content.matches(&"=".repeat(60)).count(), 2);
    }
}
