//! 应用层错误定义
//!
//! 只有作品级与收集级的致命错误会以 `Err` 返回；
//! 页级、章节级失败通过 Portals 事件上报并继续。

use thiserror::Error;

use crate::application::ports::{MappingError, TransportError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 作品不存在（404）
    #[error("Title not found: {slug}")]
    TitleNotFound { slug: String },

    /// 非预期的 HTTP 状态
    #[error("Request failed with HTTP {status}: {url}")]
    RequestFailed { url: String, status: u16 },

    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(String),

    /// 响应体无法映射
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 目录 / 更新流收集失败
    #[error("Collection failed at page {page}: {reason}")]
    CollectionFailed { page: u32, reason: String },
}

impl ApplicationError {
    pub fn title_not_found(slug: impl Into<String>) -> Self {
        Self::TitleNotFound { slug: slug.into() }
    }

    pub fn collection_failed(page: u32, reason: impl Into<String>) -> Self {
        Self::CollectionFailed {
            page,
            reason: reason.into(),
        }
    }

    /// 是否为 "作品不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TitleNotFound { .. })
    }
}

impl From<TransportError> for ApplicationError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<MappingError> for ApplicationError {
    fn from(err: MappingError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
