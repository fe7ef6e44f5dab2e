//! 提示词构建 - 业务能力层
//!
//! 生成题目和批改答案两类提示词。输出格式块必须和
//! `question_parser` 的正则保持一致。

use crate::models::{QuestionType, Subject};

/// 生成题目用的提示词
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    pub system_message: String,
    pub user_message: String,
}

/// 构建生成题目的提示词
///
/// # 参数
/// - `references`: 参考题干，按 `0. 题干` 的形式编号
/// - `num_to_generate`: 需要模型生成的题目数量
pub fn build_generation_prompt(
    subject: Subject,
    topic: &str,
    question_type: QuestionType,
    num_to_generate: usize,
    references: &[String],
) -> GenerationPrompt {
    let (instruction, output_format_example) = match question_type {
        QuestionType::Mcq => (
            format!(
                "Your task is to generate {} new **Multiple-Choice Questions (MCQ)**. \
                 Provide 4 options (A, B, C, D) and one clear reasoning step.",
                num_to_generate
            ),
            format!(
                "[Reference: 0]\n\
                 Question: ...\n\
                 Difficulty: Hard\n\
                 Topic: {}\n\
                 A) ...\n\
                 B) ...\n\
                 C) ...\n\
                 D) ...\n\
                 Answer: (B)\n\
                 Reasoning: ...\n",
                topic
            ),
        ),
        QuestionType::OpenEnded => (
            format!(
                "Your task is to generate {} new **Open-Ended Questions (Structured)**. \
                 **DO NOT PROVIDE OPTIONS.** Instead, provide a comprehensive 'Model Answer' \
                 that includes the key marking points/keywords required.",
                num_to_generate
            ),
            format!(
                "[Reference: 0]\n\
                 Question: ...\n\
                 Difficulty: Hard\n\
                 Topic: {}\n\
                 Answer: (The full model answer with keywords)\n",
                topic
            ),
        ),
    };

    let system_message = format!(
        "You are an expert **{}** tutor in Singapore. \
         I will provide reference questions. {}\n\n\
         Topic: **{}**\n\
         Difficulty: **{}**\n\n\
         **OUTPUT FORMAT (Strictly Follow):**\n\
         Your response must be a plain-text list of blocks. Do not use JSON.\n\
         {}\n\
         \n[Reference: 1]\n...",
        subject.name(),
        instruction,
        topic,
        subject.difficulty_text(),
        output_format_example
    );

    let mut user_message = String::from("Here are the reference questions:\n\n");
    for (i, question_text) in references.iter().enumerate() {
        user_message.push_str(&format!("{}. {}\n", i, question_text));
    }
    user_message.push_str(&format!(
        "\nPlease generate {} new **{}** questions on **{}**.",
        num_to_generate,
        question_type.label(),
        topic
    ));

    GenerationPrompt {
        system_message,
        user_message,
    }
}

/// 构建批改学生答案的提示词
pub fn build_grading_prompt(question: &str, model_answer: &str, student_answer: &str) -> String {
    format!(
        "You are a strict Primary School Teacher in Singapore. Grade the student's answer.\n\
         **Question:** {}\n\
         **Correct Model Answer:** {}\n\
         **Student Answer:** {}\n\n\
         **Task:**\n\
         1. Determine if the student is Correct, Partially Correct, or Incorrect.\n\
         2. Identify any missing keywords or concepts.\n\
         3. Provide brief, encouraging feedback on how to improve.\n\n\
         **Output Format:**\n\
         **Status:** [Correct/Partial/Incorrect]\n\
         **Feedback:** [Your feedback here]",
        question, model_answer, student_answer
    )
}
