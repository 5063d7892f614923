//! Downloader Port - 单文件下载到临时槽位

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {status} for {url}")]
    BadStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Downloader Port
#[async_trait]
pub trait DownloaderPort: Send + Sync {
    /// 下载 `url` 到名为 `slot` 的临时位置，返回文件路径
    async fn download(&self, url: &str, slot: &str) -> Result<PathBuf, DownloadError>;
}
