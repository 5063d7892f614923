//! Transport Port - HTTP 传输抽象
//!
//! 重试、代理、鉴权头等由具体实现负责（infrastructure/adapters/transport）

use async_trait::async_trait;
use thiserror::Error;

/// 传输错误（重试耗尽后仍无法得到响应）
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP 响应
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP 状态码
    pub status: u16,
    /// 响应体（JSON 或 HTML 文本）
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// 付费内容被锁定（401 / 423）
    pub fn is_locked(&self) -> bool {
        matches!(self.status, 401 | 423)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Transport Port
///
/// 对远程内容 API 发起 GET 请求
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}
