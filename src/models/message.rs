use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 用户提出的问题
    Question,
    /// 服务给出的回答
    Answer,
    /// 系统提示（如错误信息）
    System,
}

/// 会话中的一条消息
///
/// 创建后不可修改，顺序即追加顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 形如 "{毫秒时间戳}-{序号}"，在同一会话内唯一
    pub id: String,
    /// 会话内单调递增的序号，从 1 开始
    pub seq: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(seq: u64, role: Role, content: impl Into<String>) -> Self {
        let timestamp = Local::now();
        Self {
            id: format!("{}-{}", timestamp.timestamp_millis(), seq),
            seq,
            role,
            content: content.into(),
            timestamp,
        }
    }
}
