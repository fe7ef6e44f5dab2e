//! 题目导出 - 业务能力层
//!
//! 按扩展名把生成结果写成 JSON 或 TOML（其他扩展名按 JSON 处理）

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::AppError;
use crate::models::GeneratedSet;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Toml,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => ExportFormat::Toml,
            _ => ExportFormat::Json,
        }
    }
}

/// 序列化生成结果
pub fn render_generated_set(set: &GeneratedSet, format: ExportFormat) -> Result<String> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(set).context("无法序列化为 JSON")?,
        ExportFormat::Toml => toml::to_string_pretty(set).context("无法序列化为 TOML")?,
    };
    Ok(content)
}

/// 写入导出文件
pub async fn export_generated_set(set: &GeneratedSet, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path);
    let content = render_generated_set(set, format)?;

    fs::write(path, content)
        .await
        .map_err(|source| AppError::file(path.display().to_string(), source))?;

    info!(
        "💾 已导出 {} 道题到: {}",
        set.questions.len(),
        path.display()
    );

    Ok(())
}
