use serde::{Deserialize, Serialize};

/// 结果来源：真实的远程服务，还是本地兜底
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Remote,
    Fallback,
}

/// 本地兜底的层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTier {
    /// 问题与问答表完全匹配
    ExactMatch,
    /// 从通用回答中随机选取
    Generic,
}

/// 回答来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Remote,
    Fallback(FallbackTier),
}

impl AnswerSource {
    pub fn is_fallback(self) -> bool {
        matches!(self, AnswerSource::Fallback(_))
    }
}

/// 一次提问的回答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

impl Answer {
    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AnswerSource::Remote,
        }
    }

    pub fn fallback(text: impl Into<String>, tier: FallbackTier) -> Self {
        Self {
            text: text.into(),
            source: AnswerSource::Fallback(tier),
        }
    }
}
