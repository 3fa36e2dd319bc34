use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 问答服务的工作模式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// 不访问远程服务，始终使用本地兜底逻辑
    Offline,
    /// 优先访问远程服务，失败时退回本地兜底逻辑
    Remote,
    /// 只访问远程服务，失败直接报错（不兜底）
    Strict,
}

impl FromStr for ServiceMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" => Ok(ServiceMode::Offline),
            "remote" => Ok(ServiceMode::Remote),
            "strict" => Ok(ServiceMode::Strict),
            other => Err(AppError::config(format!(
                "未知的服务模式 '{}'，可选值: offline / remote / strict",
                other
            ))),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 问答服务地址（/upload 与 /ask 的前缀）
    pub api_base_url: String,
    /// 服务模式
    pub service_mode: ServiceMode,
    /// 离线模式下模拟的响应延迟（毫秒）
    pub stub_latency_ms: u64,
    /// 单次提问的超时时间（秒），不设置则无限等待
    pub request_timeout_secs: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 记录未命中问答表的问题的文件
    pub unmatched_log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            service_mode: ServiceMode::Offline,
            stub_latency_ms: 1000,
            request_timeout_secs: None,
            verbose_logging: false,
            unmatched_log_file: None,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置或无法解析的项使用默认值
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("PDF_CHAT_API_BASE_URL").unwrap_or(default.api_base_url),
            service_mode: std::env::var("PDF_CHAT_SERVICE_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.service_mode),
            stub_latency_ms: std::env::var("PDF_CHAT_STUB_LATENCY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.stub_latency_ms),
            request_timeout_secs: std::env::var("PDF_CHAT_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).or(default.request_timeout_secs),
            verbose_logging: std::env::var("PDF_CHAT_VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            unmatched_log_file: std::env::var("PDF_CHAT_UNMATCHED_LOG").ok().or(default.unmatched_log_file),
        }
    }

    /// 从 TOML 文件读取配置，缺失的项使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        debug!("读取配置文件: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 拼接服务端点地址
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
