//! Ranobe - 轻小说采集管线
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Title Context: 作品 / 分支 / 章节 / 段落
//! - 章节类型分类、正文规范化、结构相似度
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Transport, SourceDialect, Portals, Downloader, StubLibrary）
//! - Commands: 采集命令及处理器
//! - Paginator / CoverStubDetector / AcquisitionSession
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: reqwest Transport, Remanga 方言, 下载器, 占位图库
//! - Events: 事件日志与广播

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
