//! Stub Library Port - 占位封面样本库

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubLibraryError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Stub Library Port
#[async_trait]
pub trait StubLibraryPort: Send + Sync {
    /// 所有已知占位图样本的路径
    async fn patterns(&self) -> Result<Vec<PathBuf>, StubLibraryError>;
}
