//! # PDF Chat
//!
//! 针对单个 PDF 文档进行问答的会话引擎
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 远程问答服务的边界，只暴露能力
//! - `RemoteQaService` - `POST /upload` 与 `POST /ask` 的抽象
//! - `HttpQaClient` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档或单个问题
//! - `UploadRegistrar` - 校验文件并换取文档ID
//! - `AnswerResolver` - 远程回答 / 问答表 / 通用回答
//! - `UnmatchedWriter` - 记录未命中问答表的问题
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次提问"的完整处理流程
//! - `SessionStore` - 只追加的消息记录
//! - `Session` - 消息记录 + 激活文档 + 输入框 + 处理状态
//! - `RequestLifecycleController` - Idle → Submitting → Resolved/Failed → Idle
//!
//! ### ④ 界面层
//! - 不在本 crate 内，通过控制器提交问题，按快照渲染消息
//!
//! ## 回答来源
//!
//! 远程服务不可用时回退到本地兜底（问答表 → 随机通用回答），
//! 回答带有 `AnswerSource` 标记，调用方可以区分真实回答和兜底回答

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{HttpQaClient, RemoteQaService};
pub use config::{Config, ServiceMode};
pub use error::{AppError, AppResult, ErrorKind};
pub use models::{Answer, AnswerSource, Document, DocumentId, FallbackTier, Message, Role, UploadFile};
pub use services::{AnswerResolver, UploadRegistrar};
pub use workflow::{LifecycleState, RequestLifecycleController, SubmitOutcome, UploadOutcome};
