use thiserror::Error;

/// 错误类别
///
/// 调用方（界面层）按类别决定如何展示错误，不需要关心具体的错误细节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 文件类型或数量不合法
    InvalidInput,
    /// 没有已注册的文档就提交了问题
    NoActiveDocument,
    /// 远程服务不可用（网络失败、非 2xx、响应格式错误）
    RemoteUnavailable,
    /// 请求超时
    Timeout,
    /// 配置错误
    Config,
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 上传的文件不合法
    #[error("无效输入: {reason}")]
    InvalidInput { reason: String },

    /// 当前会话没有激活的文档
    #[error("请先上传 PDF 文档")]
    NoActiveDocument,

    /// 远程服务调用失败
    #[error("远程服务不可用 ({endpoint}): {source}")]
    RemoteUnavailable {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 等待回答超时
    #[error("请求超时 ({seconds} 秒)")]
    Timeout { seconds: u64 },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config { message: String },
}

impl AppError {
    /// 获取错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput { .. } => ErrorKind::InvalidInput,
            AppError::NoActiveDocument => ErrorKind::NoActiveDocument,
            AppError::RemoteUnavailable { .. } => ErrorKind::RemoteUnavailable,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Config { .. } => ErrorKind::Config,
        }
    }

    /// 可以直接展示给用户的描述
    ///
    /// 远程服务的错误细节（地址、状态码）不展示，返回 `None`
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::RemoteUnavailable { .. } => None,
            other => Some(other.to_string()),
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_default();
        AppError::RemoteUnavailable {
            endpoint,
            source: Box::new(err),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Config {
            message: format!("文件读写失败: {}", err),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config {
            message: format!("TOML解析失败: {}", err),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建输入校验错误
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        AppError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// 创建远程服务不可用错误
    pub fn remote_unavailable(
        endpoint: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::RemoteUnavailable {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config {
            message: message.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
