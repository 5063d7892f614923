//! Directory Stub Library - 从目录读取占位封面样本
//!
//! 实现 StubLibraryPort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{StubLibraryError, StubLibraryPort};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// 目录占位图库
///
/// 目录不存在时视为空库
pub struct DirectoryStubLibrary {
    dir: PathBuf,
}

impl DirectoryStubLibrary {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl StubLibraryPort for DirectoryStubLibrary {
    async fn patterns(&self) -> Result<Vec<PathBuf>, StubLibraryError> {
        if !self.dir.exists() {
            tracing::debug!(dir = %self.dir.display(), "Stub directory does not exist");
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StubLibraryError::IoError(e.to_string()))?;

        let mut patterns = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StubLibraryError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.is_file() && is_image(&path) {
                patterns.push(path);
            }
        }

        patterns.sort();
        Ok(patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_images_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("a.JPG"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let library = DirectoryStubLibrary::new(dir.path());
        let patterns = library.patterns().await.unwrap();

        assert_eq!(
            patterns,
            vec![dir.path().join("a.JPG"), dir.path().join("b.png")]
        );
    }

    #[tokio::test]
    async fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let library = DirectoryStubLibrary::new(dir.path().join("absent"));
        assert!(library.patterns().await.unwrap().is_empty());
    }
}
