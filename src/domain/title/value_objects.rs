//! Title Context - Value Objects

use serde::{Deserialize, Serialize};

/// 章节结构类型
///
/// 封闭集合；无法归类的章节类型为 `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterType {
    Afterword,
    Art,
    Chapter,
    Epilogue,
    Extra,
    Glossary,
    Prologue,
    Trash,
}

impl ChapterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterType::Afterword => "afterword",
            ChapterType::Art => "art",
            ChapterType::Chapter => "chapter",
            ChapterType::Epilogue => "epilogue",
            ChapterType::Extra => "extra",
            ChapterType::Glossary => "glossary",
            ChapterType::Prologue => "prologue",
            ChapterType::Trash => "trash",
        }
    }
}

/// 作品连载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStatus {
    Announced,
    Ongoing,
    Completed,
    Dropped,
}

/// 段落 - 规范化后的正文单元（HTML 片段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paragraph(String);

impl Paragraph {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Paragraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 封面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    /// 远程链接
    pub link: String,
    /// 由链接推导出的文件名
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Cover {
    /// 从链接创建封面，文件名取链接最后一段路径
    pub fn from_link(link: impl Into<String>) -> Self {
        let link = link.into();
        let filename = link
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            link,
            filename,
            width: None,
            height: None,
        }
    }
}
