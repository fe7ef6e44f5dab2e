//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、构建生成请求、创建 LLM 服务
//! 2. **生成**：委托 `GenerationFlow` 完成"加载题库 → 生成 → 重试"
//! 3. **导出**：按需把结果写入文件
//! 4. **答题**：创建 `QuizSession`，交给终端界面
//! 5. **统计**：输出 token 消耗和答题结果

use anyhow::Result;
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::GeneratedSet;
use crate::orchestrator::console::QuizConsole;
use crate::services::{export_generated_set, ChatModel, LlmService};
use crate::utils::logging::{log_generation_complete, log_session_summary, log_startup};
use crate::workflow::{GenerationFlow, GenerationOutcome, GenerationRequest, QuizSession};

/// 应用主结构
pub struct App<M: ChatModel> {
    config: Config,
    request: GenerationRequest,
    model: M,
    export_path: Option<PathBuf>,
    interactive: bool,
}

impl App<LlmService> {
    /// 根据配置和命令行初始化应用
    ///
    /// 配置或主题无效时返回 `AppError::Config`，此时不会创建 LLM 客户端
    pub fn initialize(config: Config, cli: &Cli) -> AppResult<Self> {
        config.validate()?;
        let request = cli.generation_request()?;
        let model = LlmService::new(&config);

        Ok(Self::with_model(config, request, model)
            .export_to(cli.save.clone())
            .interactive(!cli.no_quiz))
    }
}

impl<M: ChatModel> App<M> {
    pub fn with_model(config: Config, request: GenerationRequest, model: M) -> Self {
        Self {
            config,
            request,
            model,
            export_path: None,
            interactive: true,
        }
    }

    pub fn export_to(mut self, path: Option<PathBuf>) -> Self {
        self.export_path = path;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        log_startup(&self.request, &self.config.llm_model_name);

        let outcome = self.generate().await?;
        log_generation_complete(&self.request, &outcome);

        if outcome.questions.is_empty() {
            error!("❌ 没有生成任何题目");
            anyhow::bail!(
                "没有生成任何题目 (尝试 {} 次{})",
                outcome.attempts,
                outcome
                    .api_error
                    .as_deref()
                    .map(|e| format!(", 模型错误: {}", e))
                    .unwrap_or_default()
            );
        }

        if let Some(path) = &self.export_path {
            export_generated_set(&self.generated_set(&outcome), path).await?;
        }

        if !self.interactive {
            return Ok(());
        }

        let mut session = QuizSession::new(outcome.questions, outcome.tokens_used);
        let stdin = BufReader::new(tokio::io::stdin());
        QuizConsole::new(&self.model, stdin, std::io::stdout())
            .run(&mut session)
            .await?;

        log_session_summary(&session.summary(), session.tokens_used());
        Ok(())
    }

    /// 生成题目
    pub async fn generate(&self) -> Result<GenerationOutcome> {
        let mut rng = match self.config.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let reference_file = self.config.reference_file(self.request.subject);
        info!("📁 参考题库: {}", reference_file.display());

        GenerationFlow::new(&self.model, &self.config)
            .run_from_file(reference_file, &self.config.question_column, &self.request, &mut rng)
            .await
    }

    fn generated_set(&self, outcome: &GenerationOutcome) -> GeneratedSet {
        GeneratedSet {
            subject: self.request.subject,
            topic: self.request.topic.clone(),
            question_type: self.request.question_type,
            generated_at: Local::now(),
            tokens_used: outcome.tokens_used,
            questions: outcome.questions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ConfigError, ReferenceError};
    use crate::models::{QuestionType, Subject};
    use crate::services::LlmReply;
    use clap::Parser;

    struct SilentModel;

    impl ChatModel for SilentModel {
        async fn send_to_llm(
            &self,
            _user_message: &str,
            _system_message: Option<&str>,
        ) -> Result<LlmReply> {
            anyhow::bail!("不应调用模型")
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ai-question-generator").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_initialize_requires_api_key() {
        let Err(err) = App::initialize(Config::default(), &cli(&[])) else {
            panic!("缺少 API Key 时应初始化失败");
        };
        assert!(matches!(err, AppError::Config(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_initialize_rejects_topic_of_other_subject() {
        let config = Config {
            llm_api_key: "key".to_string(),
            ..Config::default()
        };
        let Err(err) = App::initialize(config, &cli(&["-s", "math", "-t", "Energy"])) else {
            panic!("主题不属于科目时应初始化失败");
        };
        assert!(matches!(err, AppError::Config(ConfigError::UnknownTopic { .. })));
    }

    #[tokio::test]
    async fn test_generate_reports_reference_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            llm_api_key: "key".to_string(),
            math_reference_file: dir.path().join("Math.toml"),
            attempt_delay_ms: 0,
            ..Config::default()
        };
        let request = GenerationRequest::new(Subject::Math, "Ratio", QuestionType::Mcq, 1);

        let err = App::with_model(config, request, SilentModel)
            .generate()
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Reference(ReferenceError::NotFound { .. }))
        ));
    }
}
