//! 请求生命周期控制 - 流程层
//!
//! 核心职责：定义"一次提问"的完整处理流程
//!
//! 状态流转：
//! 1. Idle → Submitting：追加问题消息，清空输入框
//! 2. Submitting → Resolved：追加回答消息
//! 3. Submitting → Failed：追加系统消息（错误描述）
//! 4. Resolved / Failed → Idle
//!
//! 同一会话同时只允许一个请求在处理中，处理中的提交直接忽略，不排队
//!
//! 调用方丢弃进行中的 future（超时、`select!`、任务取消）时，会话回到 Idle，
//! 已追加的问题补一条系统消息

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::clients::{HttpQaClient, RemoteQaService};
use crate::config::Config;
use crate::error::{AppError, AppResult, ErrorKind};
use crate::models::{Answer, AnswerSource, Document, DocumentId, Message, Registration, Role, UploadFile};
use crate::services::{AnswerResolver, UploadRegistrar};
use crate::utils::logging::truncate_text;
use crate::workflow::session::{LifecycleState, Session};

/// 错误没有可展示的描述时使用的提示
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to get answer from backend.";

/// 提交被忽略的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// 问题去除空白后为空
    EmptyQuestion,
    /// 已有请求在处理中
    Busy,
}

/// 一次提问的结果
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// 得到回答
    Answered {
        question: Message,
        answer: Message,
        source: AnswerSource,
    },
    /// 获取回答失败，已追加系统消息
    Failed {
        question: Message,
        notice: Message,
        kind: ErrorKind,
    },
    /// 未提交
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitOutcome::Ignored(_))
    }
}

/// 一次上传的结果
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Registered(Registration),
    Ignored(IgnoreReason),
}

/// 请求生命周期控制器
///
/// - 独占一个会话，界面层只通过它读写会话
/// - 等待回答期间不持有会话锁，重入的提交会看到处理中状态并被忽略
/// - 状态变化通过 broadcast 通知界面层
pub struct RequestLifecycleController {
    session: Arc<Mutex<Session>>,
    resolver: AnswerResolver,
    registrar: UploadRegistrar,
    request_timeout: Option<Duration>,
    events: broadcast::Sender<LifecycleState>,
}

impl RequestLifecycleController {
    /// 创建新的控制器
    pub fn new(config: &Config, resolver: AnswerResolver, registrar: UploadRegistrar) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            resolver,
            registrar,
            request_timeout: config.request_timeout_secs.map(Duration::from_secs),
            events,
        }
    }

    /// 使用同一个远程服务创建解析和注册服务
    pub fn with_remote(config: &Config, remote: Arc<dyn RemoteQaService>) -> Self {
        let resolver = AnswerResolver::new(config, remote.clone());
        let registrar = UploadRegistrar::new(config, remote);
        Self::new(config, resolver, registrar)
    }

    /// 使用 HTTP 客户端创建
    pub fn from_config(config: &Config) -> Self {
        Self::with_remote(config, Arc::new(HttpQaClient::new(config)))
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleState> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> LifecycleState {
        self.session.lock().await.state()
    }

    pub async fn is_processing(&self) -> bool {
        self.session.lock().await.is_pending()
    }

    /// 当前所有消息的快照
    pub async fn snapshot(&self) -> Vec<Message> {
        self.session.lock().await.store().snapshot()
    }

    pub async fn active_document(&self) -> Option<Document> {
        self.session.lock().await.active_document().cloned()
    }

    /// 直接激活一个已注册的文档
    pub async fn activate_document(&self, document: Document) {
        info!("📄 激活文档: {} ({})", document.name, document.id);
        self.session.lock().await.set_active_document(document);
    }

    pub async fn input(&self) -> String {
        self.session.lock().await.input().to_string()
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.session.lock().await.set_input(text);
    }

    /// 提交输入框中的内容
    pub async fn submit_input(&self) -> AppResult<SubmitOutcome> {
        let text = self.input().await;
        self.submit(&text).await
    }

    /// 上传并激活文档
    ///
    /// 文件校验失败直接返回 `InvalidInput`，不会写入消息记录
    pub async fn upload(&self, files: &[UploadFile]) -> AppResult<UploadOutcome> {
        UploadRegistrar::validate(files)?;

        {
            let mut session = self.session.lock().await;
            if session.is_pending() {
                return Ok(UploadOutcome::Ignored(IgnoreReason::Busy));
            }
            session.set_state(LifecycleState::Uploading);
        }
        let guard = self.pending_guard(None);
        self.emit(LifecycleState::Uploading);

        let result = self.registrar.register(files).await;

        {
            let mut session = self.session.lock().await;
            if let Ok(registration) = &result {
                session.set_active_document(registration.document.clone());
            }
            session.set_state(LifecycleState::Idle);
        }
        guard.disarm();
        self.emit(LifecycleState::Idle);

        Ok(UploadOutcome::Registered(result?))
    }

    /// 提交问题
    ///
    /// 检查顺序：问题为空 → 没有激活文档 → 已有请求在处理中
    ///
    /// # 返回
    /// - 问题为空：`SubmitOutcome::Ignored(EmptyQuestion)`，不做任何修改
    /// - 没有激活文档（包括首次上传尚未完成）：`AppError::NoActiveDocument`，不追加消息
    /// - 已有请求在处理中：`SubmitOutcome::Ignored(Busy)`
    /// - 其余情况：追加问题消息和回答（或系统）消息
    pub async fn submit(&self, text: &str) -> AppResult<SubmitOutcome> {
        let (document_id, question) = {
            let mut session = self.session.lock().await;

            if text.trim().is_empty() {
                return Ok(SubmitOutcome::Ignored(IgnoreReason::EmptyQuestion));
            }
            let document_id = session
                .active_document_id()
                .cloned()
                .ok_or(AppError::NoActiveDocument)?;
            if session.is_pending() {
                info!("{} 已有请求在处理中，忽略本次提交", session);
                return Ok(SubmitOutcome::Ignored(IgnoreReason::Busy));
            }

            session.set_state(LifecycleState::Submitting);
            let question = session.record(Role::Question, text);
            session.clear_input();
            (document_id, question)
        };
        let guard = self.pending_guard(Some(GENERIC_FAILURE_MESSAGE));
        self.emit(LifecycleState::Submitting);
        info!("❓ 提交问题 #{}: {}", question.seq, truncate_text(&question.content, 80));

        let result = self.resolve(&document_id, &question.content).await;

        let (outcome, settled) = {
            let mut session = self.session.lock().await;
            let finished = match result {
                Ok(answer) => {
                    let message = session.record(Role::Answer, answer.text);
                    (
                        SubmitOutcome::Answered {
                            question,
                            answer: message,
                            source: answer.source,
                        },
                        LifecycleState::Resolved,
                    )
                }
                Err(e) => {
                    warn!("⚠️ 获取回答失败: {}", e);
                    let notice = session.record(Role::System, describe_failure(&e));
                    (
                        SubmitOutcome::Failed {
                            question,
                            notice,
                            kind: e.kind(),
                        },
                        LifecycleState::Failed,
                    )
                }
            };
            session.set_state(LifecycleState::Idle);
            finished
        };
        guard.disarm();

        self.emit(settled);
        self.emit(LifecycleState::Idle);
        info!("✓ 请求结束: {:?}", settled);

        Ok(outcome)
    }

    async fn resolve(&self, document_id: &DocumentId, question: &str) -> AppResult<Answer> {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.resolver.resolve(document_id, question))
                .await
                .map_err(|_| AppError::Timeout {
                    seconds: limit.as_secs(),
                })?,
            None => self.resolver.resolve(document_id, question).await,
        }
    }

    fn emit(&self, state: LifecycleState) {
        // 没有订阅者时发送失败，忽略即可
        let _ = self.events.send(state);
    }

    fn pending_guard(&self, notice: Option<&'static str>) -> PendingGuard {
        PendingGuard {
            session: self.session.clone(),
            events: self.events.clone(),
            notice,
            armed: true,
        }
    }
}

/// 请求未走完时负责把会话恢复到 Idle
///
/// 正常结束时调用 [`PendingGuard::disarm`]；被丢弃时仍处于 armed 状态说明
/// 外层 future 在等待中被取消
struct PendingGuard {
    session: Arc<Mutex<Session>>,
    events: broadcast::Sender<LifecycleState>,
    notice: Option<&'static str>,
    armed: bool,
}

impl PendingGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let events = self.events.clone();
        let notice = self.notice;
        let reset = move |session: &mut Session| {
            if !session.is_pending() {
                return;
            }
            warn!("⚠️ {} 请求被取消，恢复为空闲状态", session);
            if let Some(notice) = notice {
                session.record(Role::System, notice);
            }
            session.set_state(LifecycleState::Idle);
            let _ = events.send(LifecycleState::Idle);
        };

        match self.session.try_lock() {
            Ok(mut session) => reset(&mut *session),
            Err(_) => {
                // 锁被占用时交给运行时稍后处理
                let session = self.session.clone();
                match Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            let mut session = session.lock().await;
                            reset(&mut *session);
                        });
                    }
                    Err(_) => warn!("⚠️ 没有可用的运行时，会话状态无法恢复"),
                }
            }
        }
    }
}

/// 失败时写入会话的提示
fn describe_failure(err: &AppError) -> String {
    err.user_message()
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
