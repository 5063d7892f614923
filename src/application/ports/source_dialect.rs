//! Source Dialect Port - 站点方言抽象
//!
//! 各站点只在 URL 与字段名上不同；分页、去重、付费墙等流程逻辑
//! 全部在应用层统一实现。方言负责：
//! - 构造 title / 章节列表页 / 章节正文 / 目录 / 更新流 的 URL
//! - 把响应体映射为统一的中间结构

use thiserror::Error;

use crate::domain::TitleStatus;

/// 字段映射错误
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// 更新流时间戳的单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochUnit {
    Seconds,
    Milliseconds,
}

impl EpochUnit {
    /// 将小时数换算为该单位
    pub fn from_hours(&self, hours: u32) -> i64 {
        let seconds = i64::from(hours) * 3600;
        match self {
            EpochUnit::Seconds => seconds,
            EpochUnit::Milliseconds => seconds * 1000,
        }
    }

    /// 当前时间在该单位下的值
    pub fn timestamp(&self, now: chrono::DateTime<chrono::Utc>) -> i64 {
        match self {
            EpochUnit::Seconds => now.timestamp(),
            EpochUnit::Milliseconds => now.timestamp_millis(),
        }
    }
}

/// 作品声明的分支
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDeclaration {
    pub id: u64,
    /// 源站声明的章节总数
    pub chapters_count: u32,
}

/// 映射后的作品元数据
#[derive(Debug, Clone, Default)]
pub struct TitleData {
    pub id: u64,
    pub localized_name: Option<String>,
    pub eng_name: Option<String>,
    pub another_names: Vec<String>,
    /// 原始 HTML 描述，由编排器清洗
    pub description: Option<String>,
    pub publication_year: Option<u32>,
    pub age_limit: Option<u8>,
    pub status: Option<TitleStatus>,
    pub is_licensed: bool,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    /// 完整封面链接（已去重）
    pub cover_links: Vec<String>,
    pub original_language: Option<String>,
    pub branches: Vec<BranchDeclaration>,
}

/// 章节列表页中的一项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterEntry {
    pub id: u64,
    pub volume: Option<String>,
    pub number: Option<String>,
    pub name: Option<String>,
    pub is_paid: bool,
    pub workers: Vec<String>,
    /// 付费章节转为免费的日期
    pub free_publication_date: Option<serde_json::Value>,
}

/// 更新流中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEntry {
    pub slug: String,
    /// 上传时间，单位见 `SourceDialect::epoch_unit`
    pub uploaded_at: i64,
}

/// Source Dialect Port
///
/// 一个站点的 FetchTitle / FetchChapterPage / FetchChapterContent 能力集，
/// 外加目录与更新流
pub trait SourceDialect: Send + Sync {
    /// 站点域名
    fn site(&self) -> &str;

    /// 章节列表每页条数
    fn chapter_page_size(&self) -> u32;

    /// 更新流时间戳单位
    fn epoch_unit(&self) -> EpochUnit;

    fn title_url(&self, slug: &str) -> String;

    fn parse_title(&self, body: &str) -> Result<TitleData, MappingError>;

    /// 章节列表页 URL，page 从 1 开始
    fn chapter_page_url(&self, branch_id: u64, page: u32) -> String;

    fn parse_chapter_page(&self, body: &str) -> Result<Vec<ChapterEntry>, MappingError>;

    fn chapter_content_url(&self, chapter_id: u64) -> String;

    /// 正文 HTML；响应中没有正文字段时返回 `None`
    fn parse_chapter_content(&self, body: &str) -> Result<Option<String>, MappingError>;

    fn catalog_url(&self, page: u32, filters: Option<&str>) -> String;

    fn parse_catalog_page(&self, body: &str) -> Result<Vec<String>, MappingError>;

    fn updates_url(&self, page: u32) -> String;

    fn parse_updates_page(&self, body: &str) -> Result<Vec<UpdateEntry>, MappingError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_unit_conversion() {
        assert_eq!(EpochUnit::Seconds.from_hours(24), 86_400);
        assert_eq!(EpochUnit::Milliseconds.from_hours(1), 3_600_000);
    }

    #[test]
    fn test_epoch_unit_timestamp() {
        let now = chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(EpochUnit::Seconds.timestamp(now), 1_700_000_000);
        assert_eq!(EpochUnit::Milliseconds.timestamp(now), 1_700_000_000_000);
    }
}
