/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::models::QuestionType;
use crate::workflow::{GenerationOutcome, GenerationRequest, SessionSummary};

/// 记录程序启动信息
pub fn log_startup(request: &GenerationRequest, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("📚 AI Question Generator 启动");
    info!("🧠 模型: {}", model_name);
    info!("📋 请求: {}", request);
    info!("{}", "=".repeat(60));
}

/// 记录单次尝试开始
///
/// # 参数
/// - `attempt`: 第几次尝试（从 1 开始）
/// - `max_retries`: 最大尝试次数
/// - `needed`: 本次需要生成的题目数量
pub fn log_attempt_start(
    attempt: usize,
    max_retries: usize,
    needed: usize,
    question_type: QuestionType,
) {
    info!(
        "Attempt {}/{}: Generating {} ({}) questions...",
        attempt,
        max_retries,
        needed,
        question_type.label()
    );
}

/// 打印生成统计信息
pub fn log_generation_complete(request: &GenerationRequest, outcome: &GenerationOutcome) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 生成完成: {}/{} 道题，尝试 {} 次",
        outcome.questions.len(),
        request.count,
        outcome.attempts
    );
    info!("🔢 Total tokens used: {}", outcome.tokens_used);
    info!("{}", "─".repeat(60));
}

/// 打印答题统计信息
pub fn log_session_summary(summary: &SessionSummary, tokens_used: u64) {
    info!("\n{}", "=".repeat(60));
    info!("📊 答题统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 正确: {}/{}", summary.correct, summary.total);
    info!("🟡 部分正确: {}", summary.partial);
    info!("📝 已作答: {}", summary.answered);
    info!("🔢 Total tokens used: {}", tokens_used);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("line one\nline two", 8), "line one...");
        assert_eq!(truncate_text("分数应用题", 2), "分数...");
    }
}
