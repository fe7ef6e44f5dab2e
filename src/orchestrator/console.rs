//! 终端答题界面 - 编排层
//!
//! 一次显示一道题，读取用户输入：
//! - 选择题输入 A-D，开放题直接输入答案（可以多行，空行结束）
//! - `:next` / `:prev` 换题，`:answer` 查看答案，`:help` 帮助，`:quit` 退出

use anyhow::Result;
use colored::*;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::models::{GeneratedQuestion, OptionLetter};
use crate::services::{ChatModel, GradeStatus, GradingService};
use crate::workflow::{McqVerdict, QuizSession};

/// 用户输入的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Reveal,
    Help,
    Quit,
    Answer(String),
}

impl Command {
    /// 解析一行输入，空行返回 None
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = match line.to_lowercase().as_str() {
            ":n" | ":next" => Command::Next,
            ":p" | ":prev" => Command::Prev,
            ":a" | ":answer" => Command::Reveal,
            ":h" | ":help" | "?" => Command::Help,
            ":q" | ":quit" | ":exit" => Command::Quit,
            _ => Command::Answer(line.to_string()),
        };
        Some(command)
    }
}

/// 终端答题界面
pub struct QuizConsole<'a, M: ChatModel, R, W> {
    grader: GradingService<'a, M>,
    input: R,
    output: W,
}

impl<'a, M, R, W> QuizConsole<'a, M, R, W>
where
    M: ChatModel,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(model: &'a M, input: R, output: W) -> Self {
        Self {
            grader: GradingService::new(model),
            input,
            output,
        }
    }

    /// 运行答题循环，直到用户退出或输入结束
    pub async fn run(&mut self, session: &mut QuizSession) -> Result<()> {
        if session.is_empty() {
            writeln!(self.output, "{}", "没有可以作答的题目。".yellow())?;
            return Ok(());
        }

        self.render_help()?;
        self.render_question(session)?;

        while let Some(line) = self.read_line().await? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            debug!("用户命令: {:?}", command);

            match command {
                Command::Quit => break,
                Command::Help => self.render_help()?,
                Command::Next => {
                    if session.next() {
                        self.render_question(session)?;
                    } else {
                        writeln!(self.output, "{}", "已经是最后一题。".yellow())?;
                    }
                }
                Command::Prev => {
                    if session.prev() {
                        self.render_question(session)?;
                    } else {
                        writeln!(self.output, "{}", "已经是第一题。".yellow())?;
                    }
                }
                Command::Reveal => self.render_answer(session)?,
                Command::Answer(first_line) => {
                    let answer = self.complete_answer(session, first_line).await?;
                    self.handle_answer(session, &answer).await?
                }
            }
        }

        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        write!(self.output, "{} ", ">".cyan())?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// 开放题继续读取后续行，直到空行或输入结束
    async fn complete_answer(
        &mut self,
        session: &QuizSession,
        first_line: String,
    ) -> Result<String> {
        if !matches!(session.current(), Some(GeneratedQuestion::OpenEnded(_))) {
            return Ok(first_line);
        }

        let mut lines = vec![first_line];
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line).await? == 0 || line.trim().is_empty() {
                break;
            }
            lines.push(line.trim_end().to_string());
        }
        Ok(lines.join("\n"))
    }

    async fn handle_answer(&mut self, session: &mut QuizSession, answer: &str) -> Result<()> {
        let Some(question) = session.current().cloned() else {
            return Ok(());
        };

        match question {
            GeneratedQuestion::Mcq(_) => {
                let Some(picked) = OptionLetter::parse_choice(answer) else {
                    writeln!(self.output, "{}", "Please pick A, B, C or D.".yellow())?;
                    return Ok(());
                };
                if let Some(verdict) = session.check_mcq(picked) {
                    self.render_verdict(&verdict)?;
                }
            }
            GeneratedQuestion::OpenEnded(q) => {
                match self.grader.grade(&q.question, &q.answer, answer).await {
                    Ok((feedback, tokens)) => {
                        session.add_tokens(tokens);
                        session.record_feedback(feedback);
                        self.render_feedback(session, &q.answer)?;
                    }
                    Err(e)
                        if matches!(
                            e.downcast_ref::<LlmError>(),
                            Some(LlmError::EmptyStudentAnswer)
                        ) =>
                    {
                        writeln!(self.output, "{}", e.to_string().yellow())?;
                    }
                    Err(e) => {
                        warn!("批改失败: {}", e);
                        writeln!(self.output, "{}", format!("Error grading answer: {}", e).red())?;
                    }
                }
            }
        }

        Ok(())
    }

    fn render_question(&mut self, session: &QuizSession) -> Result<()> {
        let Some(item) = session.current() else {
            return Ok(());
        };

        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            format!("Question {} of {}", session.current_index() + 1, session.total()).bold()
        )?;
        writeln!(
            self.output,
            "{}",
            format!(
                "Topic: {} | Mode: {} | Difficulty: {}",
                item.topic(),
                item.question_type().label(),
                item.difficulty()
            )
            .dimmed()
        )?;
        writeln!(self.output, "---")?;
        writeln!(self.output, "{}", item.question())?;

        match item {
            GeneratedQuestion::Mcq(q) => {
                writeln!(self.output)?;
                for letter in OptionLetter::ALL {
                    writeln!(self.output, "  {}) {}", letter, q.options.get(letter))?;
                }
                writeln!(self.output, "\nSelect your answer (A-D):")?;
            }
            GeneratedQuestion::OpenEnded(_) => {
                writeln!(
                    self.output,
                    "\nType your answer, then an empty line to submit & grade:"
                )?;
            }
        }

        let mut nav = Vec::new();
        if session.has_prev() {
            nav.push(":prev");
        }
        if session.has_next() {
            nav.push(":next");
        }
        if !nav.is_empty() {
            writeln!(self.output, "{}", nav.join("  ").dimmed())?;
        }

        Ok(())
    }

    fn render_verdict(&mut self, verdict: &McqVerdict) -> Result<()> {
        let correct = verdict
            .correct
            .map(|letter| letter.to_string())
            .unwrap_or_else(|| "?".to_string());

        writeln!(self.output, "---")?;
        if verdict.is_correct() {
            writeln!(self.output, "{}", format!("✅ Correct! Answer: {}", correct).green())?;
        } else {
            writeln!(
                self.output,
                "{}",
                format!("❌ Incorrect. You picked {}. Correct: {}", verdict.picked, correct).red()
            )?;
        }
        writeln!(self.output, "Reasoning: {}", verdict.reasoning)?;
        Ok(())
    }

    fn render_feedback(&mut self, session: &QuizSession, model_answer: &str) -> Result<()> {
        let Some(feedback) = session.grading_feedback() else {
            return Ok(());
        };

        let status = match feedback.status {
            GradeStatus::Correct => feedback.status.label().green(),
            GradeStatus::Partial => feedback.status.label().yellow(),
            GradeStatus::Incorrect => feedback.status.label().red(),
            GradeStatus::Unknown => feedback.status.label().normal(),
        };

        writeln!(self.output, "---")?;
        writeln!(self.output, "{}", "📝 Teacher's Feedback".bold())?;
        writeln!(self.output, "Status: {}", status)?;
        writeln!(self.output, "Feedback: {}", feedback.feedback)?;
        writeln!(self.output, "Model Answer: {}", model_answer)?;
        Ok(())
    }

    fn render_answer(&mut self, session: &QuizSession) -> Result<()> {
        let Some(item) = session.current() else {
            return Ok(());
        };

        match item {
            GeneratedQuestion::Mcq(q) => {
                let correct = q
                    .correct_letter()
                    .map(|letter| letter.to_string())
                    .unwrap_or_else(|| q.answer.clone());
                writeln!(self.output, "Answer: {}", correct)?;
                writeln!(self.output, "Reasoning: {}", q.reasoning)?;
            }
            GeneratedQuestion::OpenEnded(q) => {
                writeln!(self.output, "Model Answer: {}", q.answer)?;
            }
        }
        Ok(())
    }

    fn render_help(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "{}",
            "Commands: :next  :prev  :answer  :help  :quit".dimmed()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{McqOptions, McqQuestion, OpenEndedQuestion};
    use crate::services::LlmReply;
    use std::sync::Mutex;

    struct FixedTeacher {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedTeacher {
        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl ChatModel for FixedTeacher {
        async fn send_to_llm(
            &self,
            user_message: &str,
            _system_message: Option<&str>,
        ) -> Result<LlmReply> {
            self.prompts.lock().unwrap().push(user_message.to_string());
            Ok(LlmReply {
                content: self.reply.clone(),
                total_tokens: 7,
            })
        }
    }

    fn teacher() -> FixedTeacher {
        FixedTeacher {
            reply: "**Status:** Partial\n**Feedback:** Mention condensation.".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn mcq() -> GeneratedQuestion {
        GeneratedQuestion::Mcq(McqQuestion {
            question: "What is 25% of 80?".to_string(),
            difficulty: "Hard".to_string(),
            topic: "Percentage".to_string(),
            options: McqOptions {
                a: "16".to_string(),
                b: "20".to_string(),
                c: "25".to_string(),
                d: "40".to_string(),
            },
            answer: "(B)".to_string(),
            reasoning: "80 / 4 = 20".to_string(),
        })
    }

    fn open_ended() -> GeneratedQuestion {
        GeneratedQuestion::OpenEnded(OpenEndedQuestion {
            question: "How do clouds form?".to_string(),
            difficulty: "Hard".to_string(),
            topic: "Cycles".to_string(),
            answer: "Water vapour condenses into tiny droplets.".to_string(),
        })
    }

    async fn run_console(model: &FixedTeacher, session: &mut QuizSession, input: &str) -> String {
        colored::control::set_override(false);
        let mut output = Vec::new();
        let mut console = QuizConsole::new(model, input.as_bytes(), &mut output);
        console.run(session).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(Command::parse("  "), None);
        assert_eq!(Command::parse(":N"), Some(Command::Next));
        assert_eq!(Command::parse(":prev"), Some(Command::Prev));
        assert_eq!(Command::parse(":quit"), Some(Command::Quit));
        assert_eq!(Command::parse(" b "), Some(Command::Answer("b".to_string())));
    }

    #[tokio::test]
    async fn test_mcq_answer_checking() {
        let model = teacher();
        let mut session = QuizSession::new(vec![mcq()], 0);

        let output = run_console(&model, &mut session, "a\nb\n:quit\n").await;

        assert!(output.contains("Question 1 of 1"));
        assert!(output.contains("Topic: Percentage | Mode: MCQ | Difficulty: Hard"));
        assert!(output.contains("  B) 20"));
        assert!(output.contains("❌ Incorrect. You picked A. Correct: B"));
        assert!(output.contains("✅ Correct! Answer: B"));
        assert!(output.contains("Reasoning: 80 / 4 = 20"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_mcq_choice() {
        let model = teacher();
        let mut session = QuizSession::new(vec![mcq()], 0);

        let output = run_console(&model, &mut session, "twenty\n").await;

        assert!(output.contains("Please pick A, B, C or D."));
        assert!(!session.answer_checked());
    }

    #[tokio::test]
    async fn test_open_ended_grading() {
        let model = teacher();
        let mut session = QuizSession::new(vec![open_ended()], 100);

        let output = run_console(&model, &mut session, "Water evaporates\n").await;

        assert!(output.contains("Status: Partial"));
        assert!(output.contains("Feedback: Mention condensation."));
        assert!(output.contains("Model Answer: Water vapour condenses into tiny droplets."));
        assert_eq!(session.tokens_used(), 107);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_navigation_between_questions() {
        let model = teacher();
        let mut session = QuizSession::new(vec![mcq(), open_ended()], 0);

        let output = run_console(&model, &mut session, ":next\n:next\n:prev\n:prev\n").await;

        assert!(output.contains("Question 2 of 2"));
        assert!(output.contains("已经是最后一题。"));
        assert!(output.contains("已经是第一题。"));
        assert_eq!(session.current_index(), 0);
    }

    #[tokio::test]
    async fn test_reveal_answer() {
        let model = teacher();
        let mut session = QuizSession::new(vec![open_ended()], 0);

        let output = run_console(&model, &mut session, ":answer\n").await;

        assert!(output.contains("Model Answer: Water vapour condenses into tiny droplets."));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_open_ended_answer_spans_lines() {
        let model = teacher();
        let mut session = QuizSession::new(vec![open_ended(), mcq()], 0);

        let input = "Water evaporates from the sea.\nIt condenses into clouds.\n\n:next\n";
        let output = run_console(&model, &mut session, input).await;

        assert_eq!(model.calls(), 1);
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains(
            "**Student Answer:** Water evaporates from the sea.\nIt condenses into clouds.\n"
        ));
        assert!(output.contains("Status: Partial"));
        assert!(output.contains("Question 2 of 2"));
    }
}
