/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 设置了 `RUST_LOG` 时以它为准，否则按 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会报错
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 PDF 问答启动");
    info!("🔌 服务模式: {:?}", config.service_mode);
    info!("🌐 服务地址: {}", config.api_base_url);
    if let Some(secs) = config.request_timeout_secs {
        info!("⏱️ 请求超时: {} 秒", secs);
    }
    if let Some(path) = &config.unmatched_log_file {
        info!("📝 未命中记录: {}", path);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
