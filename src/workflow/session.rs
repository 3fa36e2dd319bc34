//! 会话状态
//!
//! 封装"当前在和哪份文档对话、聊到了哪里"这一信息

use std::fmt::Display;

use crate::models::{Document, DocumentId, Message, Role};
use crate::workflow::session_store::SessionStore;

/// 请求生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// 空闲，可以提交
    Idle,
    /// 正在上传注册文档
    Uploading,
    /// 问题已提交，等待回答
    Submitting,
    /// 已得到回答
    Resolved,
    /// 获取回答失败
    Failed,
}

/// 会话
///
/// 持有消息记录、唯一的激活文档、输入缓冲区和处理中标记
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    active_document: Option<Document>,
    input: String,
    state: LifecycleState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            store: SessionStore::new(),
            active_document: None,
            input: String::new(),
            state: LifecycleState::Idle,
        }
    }

    pub fn with_document(document: Document) -> Self {
        let mut session = Self::new();
        session.active_document = Some(document);
        session
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active_document.as_ref()
    }

    /// 激活文档的ID，空ID视为未设置
    pub fn active_document_id(&self) -> Option<&DocumentId> {
        self.active_document
            .as_ref()
            .map(|doc| &doc.id)
            .filter(|id| !id.is_empty())
    }

    /// 切换激活文档，已有的消息记录保留
    pub fn set_active_document(&mut self, document: Document) {
        self.active_document = Some(document);
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn record(&mut self, role: Role, content: impl Into<String>) -> Message {
        self.store.record(role, content)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }

    /// 是否有请求正在处理
    pub fn is_pending(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Uploading | LifecycleState::Submitting
        )
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.active_document {
            Some(doc) => write!(
                f,
                "[文档 {}#{} 消息数#{}]",
                doc.name,
                doc.id,
                self.store.len()
            ),
            None => write!(f, "[无文档 消息数#{}]", self.store.len()),
        }
    }
}
