use crate::error::ReferenceError;
use crate::models::reference::ReferenceBank;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// 参考题库文件结构：每一行是一个 `[[questions]]` 表
#[derive(Debug, Deserialize)]
struct ReferenceFile {
    #[serde(default, alias = "rows")]
    questions: Vec<toml::Table>,
}

/// 从 TOML 文件加载参考题库
///
/// 只读取 `column` 列；该列缺失或为空白的行会被丢弃
pub async fn load_reference_bank(
    path: &Path,
    column: &str,
) -> Result<ReferenceBank, ReferenceError> {
    let path_str = path.display().to_string();

    if !path.exists() {
        return Err(ReferenceError::NotFound { path: path_str });
    }

    info!("正在加载参考题库: {}", path_str);

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ReferenceError::ReadFailed {
            path: path_str.clone(),
            source,
        })?;

    let bank = parse_reference_rows(&content, column).map_err(|e| match e {
        RowsError::Parse(source) => ReferenceError::ParseFailed {
            path: path_str.clone(),
            source,
        },
        RowsError::MissingColumn => ReferenceError::MissingColumn {
            path: path_str.clone(),
            column: column.to_string(),
        },
    })?;

    if bank.is_empty() {
        return Err(ReferenceError::Empty {
            path: path_str,
            column: column.to_string(),
        });
    }

    Ok(ReferenceBank::new(path, bank))
}

/// 从题库中随机抽取参考题
///
/// 题库不足 `n` 道时给出警告并全部使用
pub fn select_reference_questions<R: Rng + ?Sized>(
    bank: &ReferenceBank,
    n: usize,
    rng: &mut R,
) -> ReferenceBank {
    let available = bank.len();
    let selected = if available < n {
        warn!(
            "⚠️ 题库只有 {} 道题 (少于 {})，将全部使用",
            available, n
        );
        available
    } else {
        n
    };

    info!(
        "✓ 成功加载 {} 道参考题，本次随机抽取 {} 道",
        available, selected
    );

    ReferenceBank::new(bank.source.clone(), bank.sample(selected, rng))
}

enum RowsError {
    Parse(toml::de::Error),
    MissingColumn,
}

fn parse_reference_rows(content: &str, column: &str) -> Result<Vec<String>, RowsError> {
    let file: ReferenceFile = toml::from_str(content).map_err(RowsError::Parse)?;

    if !file.questions.iter().any(|row| row.contains_key(column)) {
        return Err(RowsError::MissingColumn);
    }

    let questions = file
        .questions
        .iter()
        .filter_map(|row| row.get(column))
        .filter_map(cell_text)
        .collect();

    Ok(questions)
}

/// 单元格转文本，空白单元格视为缺失
fn cell_text(value: &toml::Value) -> Option<String> {
    let text = match value {
        toml::Value::String(s) => s.trim().to_string(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
