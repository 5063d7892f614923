//! HTTP Downloader - 下载封面到临时目录
//!
//! 实现 DownloaderPort trait

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::application::ports::{DownloadError, DownloaderPort};

/// HTTP 下载器配置
#[derive(Debug, Clone)]
pub struct HttpDownloaderConfig {
    /// 临时目录
    pub scratch_dir: PathBuf,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 代理 URL
    pub proxy: Option<String>,
}

impl HttpDownloaderConfig {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            timeout_secs: 30,
            proxy: None,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.is_empty());
        self
    }
}

/// HTTP 下载器
pub struct HttpDownloader {
    client: Client,
    scratch_dir: PathBuf,
}

impl HttpDownloader {
    pub fn new(config: HttpDownloaderConfig) -> Result<Self, DownloadError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy).map_err(|e| DownloadError::NetworkError(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            scratch_dir: config.scratch_dir,
        })
    }

    /// 槽位只取最后一段文件名，不允许跳出临时目录
    fn slot_path(&self, slot: &str) -> Result<PathBuf, DownloadError> {
        let name = Path::new(slot)
            .file_name()
            .ok_or_else(|| DownloadError::IoError(format!("Invalid slot name: {:?}", slot)))?;
        Ok(self.scratch_dir.join(name))
    }
}

#[async_trait]
impl DownloaderPort for HttpDownloader {
    async fn download(&self, url: &str, slot: &str) -> Result<PathBuf, DownloadError> {
        let path = self.slot_path(slot)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(DownloadError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(|e| DownloadError::IoError(e.to_string()))?;
        fs::write(&path, &bytes)
            .await
            .map_err(|e| DownloadError::IoError(e.to_string()))?;

        tracing::debug!(url = %url, path = %path.display(), size = bytes.len(), "Downloaded file");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slot_path_stays_in_scratch_dir() {
        let dir = TempDir::new().unwrap();
        let downloader = HttpDownloader::new(HttpDownloaderConfig::new(dir.path())).unwrap();

        assert_eq!(downloader.slot_path("cover.jpg").unwrap(), dir.path().join("cover.jpg"));
        assert_eq!(
            downloader.slot_path("../../etc/passwd").unwrap(),
            dir.path().join("passwd")
        );
        assert!(downloader.slot_path("..").is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpDownloaderConfig::new("temp")
            .with_timeout(5)
            .with_proxy(Some(String::new()));
        assert_eq!(config.timeout_secs, 5);
        assert!(config.proxy.is_none());
        assert!(HttpDownloader::new(config).is_ok());
    }
}
