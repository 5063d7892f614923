//! Cover Stub Detector - 占位封面检测
//!
//! 下载封面后与占位图样本逐一比对（灰度 SSIM），
//! 差异百分比低于阈值即判定为占位图。

use image::GrayImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{DownloaderPort, StubLibraryPort};
use crate::domain::{difference_percent, SimilarityError};

/// 下载封面使用的临时槽位
pub const COVER_SLOT: &str = "cover";

/// 默认判定阈值（差异百分比）
pub const DEFAULT_STUB_THRESHOLD: f64 = 50.0;

/// 读取图片并转为 8 位灰度，格式按内容识别
fn load_grayscale(path: &Path) -> Result<GrayImage, image::ImageError> {
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    Ok(image.to_luma8())
}

/// 找到第一个与封面差异低于阈值的样本
///
/// 封面无法解码时返回错误；单个样本的失败只记录日志
fn find_matching_pattern(
    cover_path: &Path,
    patterns: &[PathBuf],
    threshold: f64,
) -> Result<Option<(PathBuf, f64)>, image::ImageError> {
    let cover = load_grayscale(cover_path)?;

    for pattern_path in patterns {
        let pattern = match load_grayscale(pattern_path) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(
                    pattern = %pattern_path.display(),
                    error = %e,
                    "Unable to decode stub pattern"
                );
                continue;
            }
        };

        match difference_percent(&cover, &pattern) {
            Ok(difference) if difference < threshold => {
                return Ok(Some((pattern_path.clone(), difference)));
            }
            Ok(_) => {}
            Err(SimilarityError::DimensionMismatch(..)) => {}
            Err(e) => {
                tracing::warn!(pattern = %pattern_path.display(), error = %e, "Stub comparison failed");
            }
        }
    }

    Ok(None)
}

/// 占位封面检测器
pub struct CoverStubDetector {
    downloader: Arc<dyn DownloaderPort>,
    stubs: Arc<dyn StubLibraryPort>,
}

impl CoverStubDetector {
    pub fn new(downloader: Arc<dyn DownloaderPort>, stubs: Arc<dyn StubLibraryPort>) -> Self {
        Self { downloader, stubs }
    }

    /// 封面是否为占位图
    ///
    /// 下载失败视为非占位图；解码与比对在阻塞线程池中进行
    pub async fn is_stub(&self, url: &str) -> bool {
        let cover_path = match self.downloader.download(url, COVER_SLOT).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Unable to download cover for stub check");
                return false;
            }
        };

        let patterns = match self.stubs.patterns().await {
            Ok(patterns) => patterns,
            Err(e) => {
                tracing::warn!(error = %e, "Unable to list stub patterns");
                return false;
            }
        };

        if patterns.is_empty() {
            return false;
        }

        let comparison = tokio::task::spawn_blocking(move || {
            find_matching_pattern(&cover_path, &patterns, DEFAULT_STUB_THRESHOLD)
        })
        .await;

        match comparison {
            Ok(Ok(Some((pattern_path, difference)))) => {
                tracing::debug!(
                    url = %url,
                    pattern = %pattern_path.display(),
                    difference = difference,
                    "Cover matches stub pattern"
                );
                true
            }
            Ok(Ok(None)) => false,
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "Unable to decode cover");
                false
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Stub comparison task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{DownloadError, StubLibraryError};
    use async_trait::async_trait;
    use image::Luma;
    use tempfile::TempDir;

    /// 直接返回本地文件的下载器
    struct LocalDownloader {
        path: Option<PathBuf>,
    }

    #[async_trait]
    impl DownloaderPort for LocalDownloader {
        async fn download(&self, url: &str, _slot: &str) -> Result<PathBuf, DownloadError> {
            self.path.clone().ok_or_else(|| DownloadError::BadStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    struct FixedStubs(Vec<PathBuf>);

    #[async_trait]
    impl StubLibraryPort for FixedStubs {
        async fn patterns(&self) -> Result<Vec<PathBuf>, StubLibraryError> {
            Ok(self.0.clone())
        }
    }

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]))
    }

    fn checkerboard(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([if (x / 2 + y / 2) % 2 == 0 { 0 } else { 255 }])
        })
    }

    fn save(dir: &TempDir, name: &str, image: &GrayImage) -> PathBuf {
        let path = dir.path().join(name);
        image.save(&path).unwrap();
        path
    }

    fn detector(cover: Option<PathBuf>, patterns: Vec<PathBuf>) -> CoverStubDetector {
        CoverStubDetector::new(
            Arc::new(LocalDownloader { path: cover }),
            Arc::new(FixedStubs(patterns)),
        )
    }

    #[tokio::test]
    async fn test_identical_cover_is_stub() {
        let dir = TempDir::new().unwrap();
        let stub = save(&dir, "stub.png", &gradient(40, 60));
        let cover = save(&dir, "cover.png", &gradient(40, 60));

        assert!(detector(Some(cover), vec![stub]).is_stub("u").await);
    }

    #[tokio::test]
    async fn test_different_cover_is_not_stub() {
        let dir = TempDir::new().unwrap();
        let stub = save(&dir, "stub.png", &gradient(40, 60));
        let cover = save(&dir, "cover.png", &checkerboard(40, 60));

        assert!(!detector(Some(cover), vec![stub]).is_stub("u").await);
    }

    #[tokio::test]
    async fn test_different_dimensions_never_match() {
        let dir = TempDir::new().unwrap();
        let stub = save(&dir, "stub.png", &gradient(40, 60));
        let cover = save(&dir, "cover.png", &gradient(41, 60));

        assert!(!detector(Some(cover), vec![stub]).is_stub("u").await);
    }

    #[tokio::test]
    async fn test_corrupt_pattern_is_skipped() {
        let dir = TempDir::new().unwrap();
        let corrupt = dir.path().join("broken.png");
        std::fs::write(&corrupt, b"definitely not an image").unwrap();
        let stub = save(&dir, "stub.png", &gradient(40, 60));
        let cover = save(&dir, "cover.png", &gradient(40, 60));

        assert!(detector(Some(cover), vec![corrupt, stub]).is_stub("u").await);
    }

    #[tokio::test]
    async fn test_corrupt_cover_is_not_stub() {
        let dir = TempDir::new().unwrap();
        let cover = dir.path().join("cover.png");
        std::fs::write(&cover, b"<html>403</html>").unwrap();
        let stub = save(&dir, "stub.png", &gradient(40, 60));

        assert!(!detector(Some(cover), vec![stub]).is_stub("u").await);
    }

    #[test]
    fn test_matching_pattern_reports_first_match() {
        let dir = TempDir::new().unwrap();
        let other = save(&dir, "other.png", &checkerboard(40, 60));
        let stub = save(&dir, "stub.png", &gradient(40, 60));
        let cover = save(&dir, "cover.png", &gradient(40, 60));

        let found = find_matching_pattern(&cover, &[other, stub.clone()], DEFAULT_STUB_THRESHOLD)
            .unwrap()
            .map(|(path, _)| path);
        assert_eq!(found, Some(stub));
    }

    #[tokio::test]
    async fn test_download_failure_is_not_stub() {
        let dir = TempDir::new().unwrap();
        let stub = save(&dir, "stub.png", &gradient(40, 60));

        assert!(!detector(None, vec![stub]).is_stub("u").await);
    }
}
