use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pdf_chat::clients::{AskResponse, UploadResponse};
use pdf_chat::services::fallback_answers::GENERIC_ANSWERS;
use pdf_chat::{
    AnswerSource, AppError, AppResult, Config, DocumentId, ErrorKind, FallbackTier,
    RemoteQaService, RequestLifecycleController, Role, ServiceMode, SubmitOutcome, UploadFile,
    UploadOutcome,
};

/// 记录调用次数的远程服务
struct CountingRemote {
    available: bool,
    asks: AtomicUsize,
}

impl CountingRemote {
    fn new(available: bool) -> Arc<Self> {
        Arc::new(Self {
            available,
            asks: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl RemoteQaService for CountingRemote {
    async fn upload(&self, _file: &UploadFile) -> AppResult<UploadResponse> {
        if !self.available {
            return Err(AppError::remote_unavailable("/upload", "connection refused"));
        }
        Ok(UploadResponse {
            document_id: "doc-7f3a".to_string(),
            page_count: Some(14),
        })
    }

    async fn ask(&self, document_id: &str, question: &str) -> AppResult<AskResponse> {
        self.asks.fetch_add(1, Ordering::SeqCst);
        if !self.available {
            return Err(AppError::remote_unavailable("/ask", "connection refused"));
        }
        Ok(AskResponse {
            answer: format!("[{}] {}", document_id, question),
        })
    }
}

fn offline_config() -> Config {
    Config {
        service_mode: ServiceMode::Offline,
        stub_latency_ms: 0,
        ..Config::default()
    }
}

fn pdf() -> UploadFile {
    UploadFile::new("annual-report.pdf", "application/pdf", b"%PDF-1.7\n".to_vec())
}

#[tokio::test]
async fn test_offline_upload_then_ask() {
    let _ = tracing_subscriber::fmt::try_init();

    let controller = RequestLifecycleController::from_config(&offline_config());

    // 上传 PDF，得到文档ID
    let registration = match controller.upload(&[pdf()]).await.unwrap() {
        UploadOutcome::Registered(registration) => registration,
        other => panic!("上传应该成功: {:?}", other),
    };
    assert_eq!(registration.document.id, DocumentId::placeholder());

    // 提问
    let outcome = controller
        .submit("Can you summarize the key points?")
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Answered {
            source: AnswerSource::Fallback(FallbackTier::ExactMatch),
            ..
        }
    ));

    let messages = controller.snapshot().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::Question);
    assert_eq!(messages[0].content, "Can you summarize the key points?");
    assert_eq!(messages[1].role, Role::Answer);
    assert_eq!(
        messages[1].content,
        "The key points include a comprehensive overview, supporting data, and the final conclusions drawn by the authors."
    );
}

#[tokio::test]
async fn test_each_question_adds_two_messages() {
    let controller = RequestLifecycleController::from_config(&offline_config());
    controller.upload(&[pdf()]).await.unwrap();

    let questions = [
        "What is the main topic of this document?",
        "Is there an appendix?",
        "  What data or statistics are presented?  ",
    ];
    for (i, question) in questions.iter().enumerate() {
        controller.submit(question).await.unwrap();
        assert_eq!(controller.snapshot().await.len(), (i + 1) * 2);
    }

    let messages = controller.snapshot().await;
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [
            Role::Question,
            Role::Answer,
            Role::Question,
            Role::Answer,
            Role::Question,
            Role::Answer
        ]
    );
    assert!(GENERIC_ANSWERS.contains(&messages[3].content.as_str()));

    // 序号严格递增
    assert!(messages.windows(2).all(|pair| pair[0].seq < pair[1].seq));
}

#[tokio::test]
async fn test_question_before_upload_fails() {
    let controller = RequestLifecycleController::from_config(&offline_config());

    let err = controller.submit("What are the conclusions?").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoActiveDocument);
    assert!(controller.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_invalid_uploads_produce_no_document() {
    let controller = RequestLifecycleController::from_config(&offline_config());

    let two = controller.upload(&[pdf(), pdf()]).await.unwrap_err();
    assert_eq!(two.kind(), ErrorKind::InvalidInput);

    let image = UploadFile::new("scan.png", "image/png", vec![0x89, 0x50]);
    let wrong_type = controller.upload(&[image]).await.unwrap_err();
    assert_eq!(wrong_type.kind(), ErrorKind::InvalidInput);

    assert!(controller.active_document().await.is_none());
}

#[tokio::test]
async fn test_remote_mode_uses_service() {
    let remote = CountingRemote::new(true);
    let config = Config {
        service_mode: ServiceMode::Remote,
        ..offline_config()
    };
    let controller = RequestLifecycleController::with_remote(&config, remote.clone());

    controller.upload(&[pdf()]).await.unwrap();
    let document = controller.active_document().await.unwrap();
    assert_eq!(document.id.as_str(), "doc-7f3a");
    assert_eq!(document.page_count, 14);

    let outcome = controller.submit(" What are the conclusions? ").await.unwrap();
    match outcome {
        SubmitOutcome::Answered { answer, source, .. } => {
            assert_eq!(source, AnswerSource::Remote);
            assert_eq!(answer.content, "[doc-7f3a] What are the conclusions?");
        }
        other => panic!("预期远程回答: {:?}", other),
    }
    assert_eq!(remote.asks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remote_outage_is_absorbed() {
    let remote = CountingRemote::new(false);
    let config = Config {
        service_mode: ServiceMode::Remote,
        ..offline_config()
    };
    let controller = RequestLifecycleController::with_remote(&config, remote.clone());

    controller.upload(&[pdf()]).await.unwrap();
    assert_eq!(
        controller.active_document().await.unwrap().id.as_str(),
        "dummy-document-id"
    );

    let outcome = controller.submit("What are the conclusions?").await.unwrap();
    match outcome {
        SubmitOutcome::Answered { answer, source, .. } => {
            assert!(source.is_fallback());
            assert_eq!(
                answer.content,
                "The document concludes that the findings support the initial hypothesis and suggest further research is needed."
            );
        }
        other => panic!("远程故障应该被兜底: {:?}", other),
    }

    // 会话中没有系统消息
    let messages = controller.snapshot().await;
    assert!(messages.iter().all(|m| m.role != Role::System));
}

#[test]
fn test_controller_without_async_test_harness() {
    let controller = RequestLifecycleController::from_config(&offline_config());

    tokio_test::block_on(async {
        tokio_test::assert_ok!(controller.upload(&[pdf()]).await);
        let outcome = tokio_test::assert_ok!(controller.submit("Who are the main authors mentioned?").await);
        assert!(!outcome.is_ignored());
    });
}
