//! 上传注册服务 - 业务能力层
//!
//! 只负责"校验文件并换取文档ID"能力，不关心会话

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::{HttpQaClient, RemoteQaService};
use crate::config::{Config, ServiceMode};
use crate::error::{AppError, AppResult};
use crate::models::{Document, DocumentId, Registration, ResultSource, UploadFile};

/// 上传注册服务
///
/// 职责：
/// - 校验：每次只接受一个 PDF 文件，校验失败不会发出任何请求
/// - 远程失败时退回占位ID（严格模式除外），结果带有来源标记
pub struct UploadRegistrar {
    mode: ServiceMode,
    remote: Arc<dyn RemoteQaService>,
    stub_latency: Duration,
}

impl UploadRegistrar {
    /// 使用指定的远程服务创建
    pub fn new(config: &Config, remote: Arc<dyn RemoteQaService>) -> Self {
        Self {
            mode: config.service_mode,
            remote,
            stub_latency: Duration::from_millis(config.stub_latency_ms),
        }
    }

    /// 使用 HTTP 客户端创建
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(HttpQaClient::new(config)))
    }

    /// 校验待上传的文件列表，返回唯一的 PDF 文件
    pub fn validate(files: &[UploadFile]) -> AppResult<&UploadFile> {
        match files {
            [] => Err(AppError::invalid_input("请选择一个 PDF 文件")),
            [file] if file.is_pdf() => Ok(file),
            [file] => Err(AppError::invalid_input(format!(
                "只支持 PDF 文件，收到 {} ({})",
                file.name, file.mime_type
            ))),
            _ => Err(AppError::invalid_input(format!(
                "每次只能上传一个 PDF 文件，收到 {} 个",
                files.len()
            ))),
        }
    }

    /// 注册文档
    ///
    /// # 参数
    /// - `files`: 用户选择的文件，必须恰好是一个 PDF
    ///
    /// # 返回
    /// 返回注册结果，`source` 标明文档ID来自服务端还是占位逻辑
    pub async fn register(&self, files: &[UploadFile]) -> AppResult<Registration> {
        let file = Self::validate(files)?;
        debug!("注册文档 [{:?}]: {}", self.mode, file.name);

        let registration = match self.mode {
            ServiceMode::Offline => {
                if !self.stub_latency.is_zero() {
                    sleep(self.stub_latency).await;
                }
                Self::placeholder(file)
            }
            ServiceMode::Remote => match self.upload_remote(file).await {
                Ok(registration) => registration,
                Err(e) => {
                    warn!("⚠️ 远程上传失败，使用占位文档ID: {}", e);
                    Self::placeholder(file)
                }
            },
            ServiceMode::Strict => self.upload_remote(file).await?,
        };

        info!(
            "✓ 文档已注册: {} → {} ({:?})",
            registration.document.name, registration.document.id, registration.source
        );

        Ok(registration)
    }

    /// 上传到远程服务，空文档ID视为响应格式错误
    async fn upload_remote(&self, file: &UploadFile) -> AppResult<Registration> {
        let response = self.remote.upload(file).await?;
        let document_id = DocumentId::new(response.document_id);
        if document_id.is_empty() {
            return Err(AppError::remote_unavailable("/upload", "响应中的 documentId 为空"));
        }

        Ok(Registration {
            document: Document::new(document_id, file, response.page_count.unwrap_or(0)),
            source: ResultSource::Remote,
        })
    }

    fn placeholder(file: &UploadFile) -> Registration {
        Registration {
            document: Document::new(DocumentId::placeholder(), file, 0),
            source: ResultSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AskResponse, UploadResponse};
    use crate::error::ErrorKind;
    use crate::models::PDF_MIME_TYPE;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRemote {
        document_id: Option<&'static str>,
        uploads: AtomicUsize,
    }

    impl MockRemote {
        fn new(document_id: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                document_id,
                uploads: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl RemoteQaService for MockRemote {
        async fn upload(&self, _file: &UploadFile) -> AppResult<UploadResponse> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            match self.document_id {
                Some(id) => Ok(UploadResponse {
                    document_id: id.to_string(),
                    page_count: Some(9),
                }),
                None => Err(AppError::remote_unavailable("/upload", "HTTP 500")),
            }
        }

        async fn ask(&self, _document_id: &str, _question: &str) -> AppResult<AskResponse> {
            Err(AppError::remote_unavailable("/ask", "mock"))
        }
    }

    fn config(mode: ServiceMode) -> Config {
        Config {
            service_mode: mode,
            stub_latency_ms: 0,
            ..Config::default()
        }
    }

    fn pdf(name: &str) -> UploadFile {
        UploadFile::new(name, PDF_MIME_TYPE, b"%PDF-1.7".to_vec())
    }

    #[tokio::test]
    async fn test_rejects_invalid_files_before_upload() {
        let remote = MockRemote::new(Some("doc-remote"));
        let registrar = UploadRegistrar::new(&config(ServiceMode::Remote), remote.clone());

        let none = registrar.register(&[]).await.unwrap_err();
        assert_eq!(none.kind(), ErrorKind::InvalidInput);

        let two = registrar
            .register(&[pdf("a.pdf"), pdf("b.pdf")])
            .await
            .unwrap_err();
        assert_eq!(two.kind(), ErrorKind::InvalidInput);

        let text = UploadFile::new("notes.txt", "text/plain", b"hi".to_vec());
        let wrong_type = registrar.register(&[text]).await.unwrap_err();
        assert_eq!(wrong_type.kind(), ErrorKind::InvalidInput);

        assert_eq!(remote.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_offline_returns_placeholder() {
        let remote = MockRemote::new(Some("doc-remote"));
        let registrar = UploadRegistrar::new(&config(ServiceMode::Offline), remote.clone());

        let registration = registrar.register(&[pdf("paper.pdf")]).await.unwrap();
        assert_eq!(registration.document.id.as_str(), "dummy-document-id");
        assert_eq!(registration.document.name, "paper.pdf");
        assert_eq!(registration.source, ResultSource::Fallback);
        assert_eq!(remote.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_success_uses_remote_id() {
        let registrar =
            UploadRegistrar::new(&config(ServiceMode::Remote), MockRemote::new(Some("doc-42")));

        let registration = registrar.register(&[pdf("paper.pdf")]).await.unwrap();
        assert_eq!(registration.document.id.as_str(), "doc-42");
        assert_eq!(registration.document.page_count, 9);
        assert_eq!(registration.source, ResultSource::Remote);
    }

    #[tokio::test]
    async fn test_remote_failure_uses_placeholder() {
        let registrar = UploadRegistrar::new(&config(ServiceMode::Remote), MockRemote::new(None));

        let registration = registrar.register(&[pdf("paper.pdf")]).await.unwrap();
        assert_eq!(registration.document.id.as_str(), DocumentId::PLACEHOLDER);
        assert_eq!(registration.source, ResultSource::Fallback);
    }

    #[tokio::test]
    async fn test_blank_remote_id_is_treated_as_failure() {
        let registrar =
            UploadRegistrar::new(&config(ServiceMode::Remote), MockRemote::new(Some("  ")));
        let registration = registrar.register(&[pdf("paper.pdf")]).await.unwrap();
        assert_eq!(registration.document.id.as_str(), DocumentId::PLACEHOLDER);
        assert_eq!(registration.source, ResultSource::Fallback);

        let strict =
            UploadRegistrar::new(&config(ServiceMode::Strict), MockRemote::new(Some("")));
        let err = strict.register(&[pdf("paper.pdf")]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteUnavailable);
    }

    #[tokio::test]
    async fn test_strict_failure_propagates() {
        let registrar = UploadRegistrar::new(&config(ServiceMode::Strict), MockRemote::new(None));

        let err = registrar.register(&[pdf("paper.pdf")]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteUnavailable);
    }
}
