//! 会话消息记录
//!
//! 只追加、不删除、不修改，顺序即追加顺序

use crate::models::{Message, Role};

/// 会话消息记录
#[derive(Debug, Default)]
pub struct SessionStore {
    messages: Vec<Message>,
    last_seq: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一条带有下一个序号的消息（不追加）
    pub fn next_message(&mut self, role: Role, content: impl Into<String>) -> Message {
        self.last_seq += 1;
        Message::new(self.last_seq, role, content)
    }

    /// 追加消息
    pub fn append(&mut self, message: Message) {
        self.last_seq = self.last_seq.max(message.seq);
        self.messages.push(message);
    }

    /// 创建并追加消息，返回追加后的副本
    pub fn record(&mut self, role: Role, content: impl Into<String>) -> Message {
        let message = self.next_message(role, content);
        self.append(message.clone());
        message
    }

    /// 当前所有消息的快照
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
