//! 回答解析服务 - 业务能力层
//!
//! 只负责"给定文档和问题，得到一个回答"能力，不关心会话和流程
//!
//! ## 回答来源
//! 1. 远程问答服务（`POST /ask`）
//! 2. 本地兜底第一层：问答表完全匹配
//! 3. 本地兜底第二层：从通用回答中随机选取
//!
//! 随机源是 `StdRng`，可以通过 [`AnswerResolver::with_rng`] 注入固定种子

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::{HttpQaClient, RemoteQaService};
use crate::config::{Config, ServiceMode};
use crate::error::AppResult;
use crate::models::{Answer, DocumentId, FallbackTier};
use crate::services::fallback_answers::{self, GENERIC_ANSWERS, SUGGESTED_QUESTIONS};
use crate::services::unmatched_writer::UnmatchedWriter;
use crate::utils::logging::truncate_text;

/// 回答解析服务
///
/// 职责：
/// - 按服务模式决定走远程还是本地兜底
/// - 远程失败时的兜底是显式分支，结果带有来源标记
/// - 不检查文档ID是否为空（由生命周期控制器负责）
/// - 不做重试
pub struct AnswerResolver {
    mode: ServiceMode,
    remote: Arc<dyn RemoteQaService>,
    rng: Mutex<StdRng>,
    stub_latency: Duration,
    unmatched_writer: Option<UnmatchedWriter>,
}

impl AnswerResolver {
    /// 使用指定的远程服务创建
    pub fn new(config: &Config, remote: Arc<dyn RemoteQaService>) -> Self {
        Self {
            mode: config.service_mode,
            remote,
            rng: Mutex::new(StdRng::from_entropy()),
            stub_latency: Duration::from_millis(config.stub_latency_ms),
            unmatched_writer: config
                .unmatched_log_file
                .as_ref()
                .map(UnmatchedWriter::with_path),
        }
    }

    /// 使用 HTTP 客户端创建
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(HttpQaClient::new(config)))
    }

    /// 替换随机源
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// 推荐问题（与第一层问答表一致）
    pub fn suggested_questions() -> &'static [&'static str] {
        &SUGGESTED_QUESTIONS
    }

    /// 解析回答
    ///
    /// # 参数
    /// - `document_id`: 文档ID
    /// - `question`: 原始问题，会先去除首尾空白
    ///
    /// # 返回
    /// 离线和远程模式下总是成功；严格模式下远程失败返回 `RemoteUnavailable`
    pub async fn resolve(&self, document_id: &DocumentId, question: &str) -> AppResult<Answer> {
        let question = question.trim();
        debug!(
            "解析回答 [{:?}] 文档 {} | 问题: {}",
            self.mode,
            document_id,
            truncate_text(question, 80)
        );

        match self.mode {
            ServiceMode::Offline => {
                if !self.stub_latency.is_zero() {
                    sleep(self.stub_latency).await;
                }
                Ok(self.fallback(document_id, question).await)
            }
            ServiceMode::Remote => match self.ask_remote(document_id, question).await {
                Ok(answer) => Ok(answer),
                Err(e) => {
                    warn!("⚠️ 远程问答失败，使用本地兜底回答: {}", e);
                    Ok(self.fallback(document_id, question).await)
                }
            },
            ServiceMode::Strict => self.ask_remote(document_id, question).await,
        }
    }

    async fn ask_remote(&self, document_id: &DocumentId, question: &str) -> AppResult<Answer> {
        let response = self.remote.ask(document_id.as_str(), question).await?;
        debug!("远程回答长度: {} 字符", response.answer.len());
        Ok(Answer::remote(response.answer))
    }

    /// 本地兜底：先查问答表，未命中再随机选取通用回答
    async fn fallback(&self, document_id: &DocumentId, question: &str) -> Answer {
        if let Some(text) = fallback_answers::exact_answer(question) {
            debug!("✓ 问答表命中");
            return Answer::fallback(text, FallbackTier::ExactMatch);
        }

        let index = self.pick_generic_index();
        info!("问答表未命中，使用第 {} 条通用回答", index + 1);

        if let Some(writer) = &self.unmatched_writer {
            if let Err(e) = writer.write(document_id.as_str(), question).await {
                warn!("写入未命中记录失败: {}", e);
            }
        }

        Answer::fallback(GENERIC_ANSWERS[index], FallbackTier::Generic)
    }

    fn pick_generic_index(&self) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..GENERIC_ANSWERS.len())
    }
}
