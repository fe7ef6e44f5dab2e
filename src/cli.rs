use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::models::{QuestionType, Subject};
use crate::workflow::GenerationRequest;

/// 命令行参数：本次运行要生成什么
#[derive(Debug, Parser)]
#[command(name = "ai-question-generator", about = "Generate PSLE-style quiz questions with an LLM")]
pub struct Cli {
    /// Subject: math or science
    #[arg(long, short = 's', default_value = "math")]
    pub subject: Subject,

    /// Topic within the subject (defaults to the subject's first topic)
    #[arg(long, short = 't')]
    pub topic: Option<String>,

    /// Question type: mcq or open-ended
    #[arg(long, short = 'q', default_value = "mcq")]
    pub question_type: QuestionType,

    /// How many questions to generate
    #[arg(
        long,
        short = 'n',
        default_value_t = 3,
        value_parser = clap::value_parser!(u8).range(1..=10)
    )]
    pub count: u8,

    /// Export the generated questions (.json or .toml)
    #[arg(long, env = "QUESTION_EXPORT_FILE")]
    pub save: Option<PathBuf>,

    /// Generate (and export) only, skip the interactive quiz
    #[arg(long)]
    pub no_quiz: bool,

    /// Verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// 校验主题并构建生成请求
    pub fn generation_request(&self) -> Result<GenerationRequest, ConfigError> {
        let topic = match &self.topic {
            None => self.subject.default_topic(),
            Some(topic) => self
                .subject
                .find_topic(topic)
                .ok_or_else(|| ConfigError::UnknownTopic {
                    topic: topic.clone(),
                    subject: self.subject.to_string(),
                    available: self.subject.topics().join(", "),
                })?,
        };

        Ok(GenerationRequest::new(
            self.subject,
            topic,
            self.question_type,
            usize::from(self.count),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ai-question-generator"]).unwrap();
        let request = cli.generation_request().unwrap();
        assert_eq!(request.subject, Subject::Math);
        assert_eq!(request.topic, "Fractions");
        assert_eq!(request.question_type, QuestionType::Mcq);
        assert_eq!(request.count, 3);
        assert!(!cli.no_quiz);
    }

    #[test]
    fn test_topic_is_normalized() {
        let cli = Cli::try_parse_from([
            "ai-question-generator",
            "--subject",
            "science",
            "--topic",
            "energy",
            "--question-type",
            "open-ended",
            "-n",
            "10",
        ])
        .unwrap();
        let request = cli.generation_request().unwrap();
        assert_eq!(request.subject, Subject::Science);
        assert_eq!(request.topic, "Energy");
        assert_eq!(request.question_type, QuestionType::OpenEnded);
        assert_eq!(request.count, 10);
    }

    #[test]
    fn test_topic_must_belong_to_subject() {
        let cli =
            Cli::try_parse_from(["ai-question-generator", "-s", "science", "-t", "Algebra"])
                .unwrap();
        assert!(matches!(
            cli.generation_request(),
            Err(ConfigError::UnknownTopic { .. })
        ));
    }

    #[test]
    fn test_count_is_bounded() {
        assert!(Cli::try_parse_from(["ai-question-generator", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["ai-question-generator", "-n", "11"]).is_err());
    }
}
