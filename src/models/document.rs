use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::answer::ResultSource;

/// PDF 的 MIME 类型
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// 文档标识
///
/// 上传成功后由服务端（或占位逻辑）分配，之后的所有提问都以它为作用域
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// 远程服务不可用时使用的占位标识
    pub const PLACEHOLDER: &'static str = "dummy-document-id";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 待上传的文件
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 从磁盘读取文件，按扩展名推断 MIME 类型
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::invalid_input(format!("无法读取文件 {}: {}", path.display(), e))
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        let mime_type = if is_pdf {
            PDF_MIME_TYPE
        } else {
            "application/octet-stream"
        };

        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }
}

/// 已注册的文档
///
/// 注册成功后创建，之后不再修改；不跨进程持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub size_bytes: u64,
    /// 服务端未返回页数时为 0
    pub page_count: u32,
    pub uploaded_at: DateTime<Local>,
}

impl Document {
    pub fn new(id: DocumentId, file: &UploadFile, page_count: u32) -> Self {
        Self {
            id,
            name: file.name.clone(),
            size_bytes: file.size_bytes(),
            page_count,
            uploaded_at: Local::now(),
        }
    }

    /// 便于展示的文件大小，如 "2.4 MB"
    pub fn display_size(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;

        let size = self.size_bytes as f64;
        if size >= MB {
            format!("{:.1} MB", size / MB)
        } else if size >= KB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

/// 上传注册结果
#[derive(Debug, Clone)]
pub struct Registration {
    pub document: Document,
    /// 标识来自服务端还是占位逻辑
    pub source: ResultSource,
}
