/// 问答服务 API 客户端
///
/// 封装所有与远程问答服务相关的调用逻辑
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::UploadFile;

/// `POST /upload` 的响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub document_id: String,
    #[serde(default)]
    pub page_count: Option<u32>,
}

/// `POST /ask` 的请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest<'a> {
    pub document_id: &'a str,
    pub question: &'a str,
}

/// `POST /ask` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// 远程问答能力
///
/// 任何失败（网络错误、非 2xx、响应格式错误）都以 `AppError::RemoteUnavailable` 返回，
/// 是否兜底由调用方决定
#[async_trait]
pub trait RemoteQaService: Send + Sync {
    /// 上传文档，返回服务端分配的文档标识
    async fn upload(&self, file: &UploadFile) -> AppResult<UploadResponse>;

    /// 针对文档提问
    async fn ask(&self, document_id: &str, question: &str) -> AppResult<AskResponse>;
}

/// 基于 HTTP 的问答服务客户端
pub struct HttpQaClient {
    client: Client,
    upload_url: String,
    ask_url: String,
}

impl HttpQaClient {
    /// 创建新的问答服务客户端
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            upload_url: config.endpoint("upload"),
            ask_url: config.endpoint("ask"),
        }
    }
}

#[async_trait]
impl RemoteQaService for HttpQaClient {
    async fn upload(&self, file: &UploadFile) -> AppResult<UploadResponse> {
        debug!("上传文档: {} ({} 字节)", file.name, file.size_bytes());

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::remote_unavailable(
                "/upload",
                format!("HTTP {}", status),
            ));
        }

        let body: UploadResponse = response.json().await?;
        debug!("上传成功，文档ID: {}", body.document_id);

        Ok(body)
    }

    async fn ask(&self, document_id: &str, question: &str) -> AppResult<AskResponse> {
        debug!("提问: 文档 {} | 问题长度: {} 字符", document_id, question.len());

        let response = self
            .client
            .post(&self.ask_url)
            .json(&AskRequest {
                document_id,
                question,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::remote_unavailable(
                "/ask",
                format!("HTTP {}", status),
            ));
        }

        let body: AskResponse = response.json().await?;
        Ok(body)
    }
}
