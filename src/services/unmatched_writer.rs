//! 未命中记录服务 - 业务能力层
//!
//! 只负责"把没有命中问答表的问题写入文件"能力，不关心流程

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 未命中记录服务
///
/// 职责：
/// - 记录落到通用回答的问题，便于后续补充问答表
/// - 一次只处理一个问题
pub struct UnmatchedWriter {
    file_path: PathBuf,
}

impl UnmatchedWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// 追加一条未命中记录
    ///
    /// # 参数
    /// - `document_id`: 文档ID
    /// - `question`: 去除首尾空白后的问题
    pub async fn write(&self, document_id: &str, question: &str) -> AppResult<()> {
        debug!(
            "写入未命中记录: 文档 {} | 问题长度: {}",
            document_id,
            question.len()
        );

        let line = format!(
            "{} | 文档 {} | 问题: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            document_id,
            question
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await
            .map_err(|e| {
                AppError::config(format!(
                    "无法打开未命中记录文件 {}: {}",
                    self.file_path.display(),
                    e
                ))
            })?;

        file.write_all(line.as_bytes()).await?;
        // tokio 的文件写入在后台线程完成，返回前必须等它落盘
        file.flush().await?;

        Ok(())
    }
}
