//! 题目生成流程 - 流程层
//!
//! 核心职责：定义"一次生成"的完整流程
//!
//! 流程顺序：
//! 1. 加载参考题库并抽取参考题（每次运行一次）
//! 2. 抽取本轮参考子集 → 构建提示词 → 调用模型 → 解析
//! 3. 题目不足时重试，直到数量足够或达到最大尝试次数

use anyhow::Result;
use rand::Rng;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    load_reference_bank, select_reference_questions, GeneratedQuestion, ReferenceBank,
};
use crate::services::{
    build_generation_prompt, parse_generated_questions, ChatModel, UnparsedWriter,
};
use crate::utils::logging::{log_attempt_start, truncate_text};
use crate::workflow::generation_request::GenerationRequest;

/// 每道待生成的题目最多搭配的参考题数量
const REFERENCES_PER_QUESTION: usize = 5;

/// 生成结果
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub questions: Vec<GeneratedQuestion>,
    /// 实际调用模型的次数
    pub attempts: usize,
    pub tokens_used: u64,
    /// 模型调用失败导致提前结束时的错误信息
    pub api_error: Option<String>,
}

impl GenerationOutcome {
    pub fn is_complete(&self, request: &GenerationRequest) -> bool {
        self.questions.len() >= request.count
    }
}

/// 题目生成流程
///
/// - 决定每轮要多少题、给多少参考题
/// - 决定何时重试、何时放弃
/// - 只依赖业务能力（services）
pub struct GenerationFlow<'a, M: ChatModel> {
    model: &'a M,
    unparsed_writer: Option<UnparsedWriter>,
    max_retries: usize,
    sample_size: usize,
    attempt_delay: Duration,
}

impl<'a, M: ChatModel> GenerationFlow<'a, M> {
    /// 创建新的生成流程
    pub fn new(model: &'a M, config: &Config) -> Self {
        let unparsed_writer = if config.unparsed_log_file.trim().is_empty() {
            None
        } else {
            Some(UnparsedWriter::with_path(config.unparsed_log_file.clone()))
        };

        Self {
            model,
            unparsed_writer,
            max_retries: config.max_retries,
            sample_size: config.reference_sample_size,
            attempt_delay: config.attempt_delay(),
        }
    }

    /// 从题库文件开始的完整流程
    pub async fn run_from_file<R: Rng + ?Sized>(
        &self,
        reference_file: &Path,
        column: &str,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<GenerationOutcome> {
        let bank = load_reference_bank(reference_file, column)
            .await
            .map_err(AppError::from)?;
        let selection = select_reference_questions(&bank, self.sample_size, rng);
        self.run(&selection, request, rng).await
    }

    /// 在已抽取的参考题上执行生成循环
    pub async fn run<R: Rng + ?Sized>(
        &self,
        selection: &ReferenceBank,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<GenerationOutcome> {
        let mut outcome = GenerationOutcome::default();

        info!("🚀 开始生成 {}", request);

        while outcome.questions.len() < request.count && outcome.attempts < self.max_retries {
            let needed = request.count - outcome.questions.len();
            let subset_size = self
                .sample_size
                .min(needed * REFERENCES_PER_QUESTION)
                .min(selection.len());
            let references = selection.sample(subset_size, rng);

            log_attempt_start(
                outcome.attempts + 1,
                self.max_retries,
                needed,
                request.question_type,
            );

            if !self.attempt_delay.is_zero() {
                tokio::time::sleep(self.attempt_delay).await;
            }

            let prompt = build_generation_prompt(
                request.subject,
                &request.topic,
                request.question_type,
                needed,
                &references,
            );

            outcome.attempts += 1;

            let reply = match self
                .model
                .send_to_llm(&prompt.user_message, Some(&prompt.system_message))
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    error!("❌ 与模型通信失败: {}", e);
                    outcome.api_error = Some(e.to_string());
                    break;
                }
            };

            outcome.tokens_used += reply.total_tokens;

            let parsed = parse_generated_questions(&reply.content, request.question_type);

            if parsed.is_empty() {
                warn!(
                    "⚠️ Parser failed. Retrying... (回复预览: {})",
                    truncate_text(&reply.content, 80)
                );
                self.record_unparsed(request, outcome.attempts, &reply.content);
                continue;
            }

            let parsed_count = parsed.len();
            outcome.questions.extend(parsed.into_iter().take(needed));
            info!(
                "✓ Added {} questions. (解析 {} 道，当前 {}/{})",
                parsed_count.min(needed),
                parsed_count,
                outcome.questions.len(),
                request.count
            );
        }

        if !outcome.is_complete(request) {
            warn!(
                "⚠️ 只生成了 {}/{} 道题 (尝试 {} 次)",
                outcome.questions.len(),
                request.count,
                outcome.attempts
            );
        }

        Ok(outcome)
    }

    /// 写入失败不影响生成流程
    fn record_unparsed(&self, request: &GenerationRequest, attempt: usize, reply: &str) {
        if let Some(writer) = &self.unparsed_writer {
            if let Err(e) = writer.write(request, attempt, reply) {
                warn!("⚠️ 无法记录解析失败的回复 ({}): {}", writer.path(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionType, Subject};
    use crate::services::LlmReply;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按顺序返回预设回复的假模型
    struct ScriptedModel {
        replies: Mutex<VecDeque<std::result::Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl ChatModel for ScriptedModel {
        async fn send_to_llm(
            &self,
            user_message: &str,
            _system_message: Option<&str>,
        ) -> Result<LlmReply> {
            self.prompts.lock().unwrap().push(user_message.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(content)) => Ok(LlmReply {
                    content,
                    total_tokens: 100,
                }),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => Err(anyhow::anyhow!("没有更多预设回复")),
            }
        }
    }

    fn open_ended_reply(range: std::ops::Range<usize>) -> String {
        range
            .map(|i| {
                format!(
                    "[Reference: {i}]\nQuestion: Question {i}?\nDifficulty: Hard\n\
                     Topic: Energy\nAnswer: Model answer {i}.\n"
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn config(unparsed_log_file: String) -> Config {
        Config {
            llm_api_key: "test".to_string(),
            attempt_delay_ms: 0,
            unparsed_log_file,
            ..Config::default()
        }
    }

    fn selection(n: usize) -> ReferenceBank {
        ReferenceBank::new(
            "Science.toml",
            (0..n).map(|i| format!("Reference question {}", i)).collect(),
        )
    }

    fn request(count: usize) -> GenerationRequest {
        GenerationRequest::new(Subject::Science, "Energy", QuestionType::OpenEnded, count)
    }

    #[tokio::test]
    async fn test_single_attempt_when_reply_is_complete() {
        let model = ScriptedModel::new(vec![Ok(open_ended_reply(0..3))]);
        let flow = GenerationFlow::new(&model, &config(String::new()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = flow.run(&selection(50), &request(3), &mut rng).await.unwrap();

        assert_eq!(outcome.questions.len(), 3);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.tokens_used, 100);
        assert!(outcome.api_error.is_none());
    }

    #[tokio::test]
    async fn test_retry_asks_only_for_missing_questions() {
        let model =
            ScriptedModel::new(vec![Ok(open_ended_reply(0..1)), Ok(open_ended_reply(1..3))]);
        let flow = GenerationFlow::new(&model, &config(String::new()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = flow.run(&selection(50), &request(3), &mut rng).await.unwrap();

        assert_eq!(outcome.questions.len(), 3);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.tokens_used, 200);

        let prompts = model.prompts();
        // 第一轮 3 × 5 = 15 道参考题，第二轮 2 × 5 = 10 道
        assert_eq!(prompts[0].matches("Reference question").count(), 15);
        assert!(prompts[0]
            .ends_with("Please generate 3 new **Open-Ended** questions on **Energy**."));
        assert_eq!(prompts[1].matches("Reference question").count(), 10);
        assert!(prompts[1]
            .ends_with("Please generate 2 new **Open-Ended** questions on **Energy**."));
    }

    #[tokio::test]
    async fn test_reference_subset_capped_by_selection() {
        let model = ScriptedModel::new(vec![Ok(open_ended_reply(0..2))]);
        let flow = GenerationFlow::new(&model, &config(String::new()));
        let mut rng = StdRng::seed_from_u64(1);

        flow.run(&selection(4), &request(2), &mut rng).await.unwrap();

        assert_eq!(model.prompts()[0].matches("Reference question").count(), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries_and_logs_replies() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("unparsed.txt");
        let replies = (0..6).map(|_| Ok("I cannot do that.".to_string())).collect();
        let model = ScriptedModel::new(replies);
        let flow = GenerationFlow::new(&model, &config(log_path.to_string_lossy().to_string()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = flow.run(&selection(50), &request(3), &mut rng).await.unwrap();

        assert!(outcome.questions.is_empty());
        assert_eq!(outcome.attempts, 5);
        assert_eq!(model.prompts().len(), 5);

        let logged = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(logged.matches("I cannot do that.").count(), 5);
    }

    #[tokio::test]
    async fn test_api_error_stops_loop_and_keeps_questions() {
        let model = ScriptedModel::new(vec![
            Ok(open_ended_reply(0..1)),
            Err("quota exceeded".to_string()),
            Ok(open_ended_reply(1..3)),
        ]);
        let flow = GenerationFlow::new(&model, &config(String::new()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = flow.run(&selection(50), &request(3), &mut rng).await.unwrap();

        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.api_error.as_deref(), Some("quota exceeded"));
        assert!(!outcome.is_complete(&request(3)));
    }

    #[tokio::test]
    async fn test_surplus_questions_are_dropped() {
        let model = ScriptedModel::new(vec![Ok(open_ended_reply(0..5))]);
        let flow = GenerationFlow::new(&model, &config(String::new()));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = flow.run(&selection(50), &request(2), &mut rng).await.unwrap();

        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.questions[1].question(), "Question 1?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_before_each_attempt() {
        let model =
            ScriptedModel::new(vec![Ok(open_ended_reply(0..1)), Ok(open_ended_reply(1..2))]);
        let config = Config {
            attempt_delay_ms: 3000,
            ..config(String::new())
        };
        let flow = GenerationFlow::new(&model, &config);
        let mut rng = StdRng::seed_from_u64(1);

        let started = tokio::time::Instant::now();
        flow.run(&selection(50), &request(2), &mut rng).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(6000));
    }
}
