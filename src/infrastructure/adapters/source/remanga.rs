//! Remanga Dialect - remanga 系站点的 API 方言
//!
//! API:
//! - GET https://{site}/api/v2/titles/{slug}/
//! - GET https://{site}/api/v2/titles/chapters/?branch_id={id}&ordering=-index&page={n}
//! - GET https://{site}/api/v2/titles/chapters/{id}
//! - GET https://{site}/api/search/catalog/?page={n}&count=30&ordering=-id{filters}
//! - GET https://{site}/api/titles/last-chapters/?page={n}&count=20

use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{
    BranchDeclaration, ChapterEntry, EpochUnit, MappingError, SourceDialect, TitleData,
    UpdateEntry,
};
use crate::domain::TitleStatus;

/// 章节列表每页条数
pub const CHAPTERS_PAGE_SIZE: u32 = 50;
/// 目录每页条数
pub const CATALOG_PAGE_SIZE: u32 = 30;
/// 更新流每页条数
pub const UPDATES_PAGE_SIZE: u32 = 20;

const LOCALIZED_NAME_SUFFIX: &str = "(Новелла)";
const ENG_NAME_SUFFIX: &str = "(Novel)";

#[derive(Deserialize)]
struct TitleResponse {
    id: u64,
    #[serde(default)]
    main_name: Option<String>,
    #[serde(default)]
    secondary_name: Option<String>,
    #[serde(default)]
    another_name: Option<String>,
    #[serde(default)]
    cover: Option<CoverSet>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    issue_year: Option<u32>,
    #[serde(default)]
    age_limit: Option<AgeLimit>,
    #[serde(default)]
    status: Option<Named>,
    #[serde(rename = "type", default)]
    title_type: Option<Named>,
    #[serde(default)]
    is_licensed: Option<bool>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    categories: Vec<Named>,
    #[serde(default)]
    branches: Vec<BranchData>,
}

#[derive(Deserialize, Default)]
struct CoverSet {
    #[serde(default)]
    high: Option<String>,
    #[serde(default)]
    mid: Option<String>,
    #[serde(default)]
    low: Option<String>,
}

/// 年龄限制：新接口为对象，旧接口为整数
#[derive(Deserialize)]
#[serde(untagged)]
enum AgeLimit {
    Code(u8),
    Object { id: u8 },
}

impl AgeLimit {
    fn code(&self) -> u8 {
        match self {
            AgeLimit::Code(code) => *code,
            AgeLimit::Object { id } => *id,
        }
    }
}

#[derive(Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct BranchData {
    id: u64,
    #[serde(default)]
    count_chapters: u32,
}

#[derive(Deserialize)]
struct ChapterPage {
    #[serde(default)]
    results: Vec<ChapterData>,
}

#[derive(Deserialize)]
struct ChapterData {
    id: u64,
    #[serde(default)]
    tome: Value,
    #[serde(default)]
    chapter: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_paid: bool,
    #[serde(default)]
    publishers: Vec<Named>,
    #[serde(default)]
    delay_pub_date: Option<Value>,
}

#[derive(Deserialize)]
struct ChapterContent {
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Deserialize)]
struct ListingPage<T> {
    #[serde(alias = "results", default = "Vec::new")]
    content: Vec<T>,
}

#[derive(Deserialize)]
struct CatalogItem {
    dir: String,
}

#[derive(Deserialize)]
struct UpdateItem {
    dir: String,
    upload_date: i64,
}

/// Remanga 方言
#[derive(Debug, Clone)]
pub struct RemangaDialect {
    site: String,
}

impl RemangaDialect {
    pub fn new(site: impl Into<String>) -> Self {
        Self { site: site.into() }
    }

    fn base(&self) -> String {
        format!("https://{}", self.site)
    }

    fn cover_link(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base(), path)
        }
    }
}

/// 数字或字符串字段转为字符串
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn strip_suffix(name: Option<String>, suffix: &str) -> Option<String> {
    let name = name?;
    let trimmed = name.strip_suffix(suffix).unwrap_or(&name).trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn original_language(type_name: &str) -> Option<String> {
    let code = match type_name {
        "Авторское" => "rus",
        "Япония" => "jpn",
        "Корея" => "kor",
        "Китай" => "zho",
        "Запад" => "eng",
        _ => return None,
    };
    Some(code.to_string())
}

fn status(status_name: &str) -> Option<TitleStatus> {
    match status_name {
        "Продолжается" => Some(TitleStatus::Ongoing),
        "Закончен" => Some(TitleStatus::Completed),
        "Анонс" => Some(TitleStatus::Announced),
        "Заморожен" | "Нет переводчика" | "Не переводится (лицензировано)" => {
            Some(TitleStatus::Dropped)
        }
        _ => None,
    }
}

fn age_limit(code: u8) -> Option<u8> {
    match code {
        0 => Some(0),
        1 => Some(16),
        2 => Some(18),
        _ => None,
    }
}

impl SourceDialect for RemangaDialect {
    fn site(&self) -> &str {
        &self.site
    }

    fn chapter_page_size(&self) -> u32 {
        CHAPTERS_PAGE_SIZE
    }

    fn epoch_unit(&self) -> EpochUnit {
        EpochUnit::Milliseconds
    }

    fn title_url(&self, slug: &str) -> String {
        format!("{}/api/v2/titles/{}/", self.base(), slug)
    }

    fn parse_title(&self, body: &str) -> Result<TitleData, MappingError> {
        let data: TitleResponse = serde_json::from_str(body)?;

        let mut cover_links: Vec<String> = Vec::new();
        let covers = data.cover.unwrap_or_default();
        for path in [covers.high, covers.mid, covers.low].into_iter().flatten() {
            if path.is_empty() || path == "/media/None" {
                continue;
            }
            let link = self.cover_link(&path);
            if !cover_links.contains(&link) {
                cover_links.push(link);
            }
        }

        let another_names = data
            .another_name
            .unwrap_or_default()
            .split(" / ")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();

        Ok(TitleData {
            id: data.id,
            localized_name: strip_suffix(data.main_name, LOCALIZED_NAME_SUFFIX),
            eng_name: strip_suffix(data.secondary_name, ENG_NAME_SUFFIX),
            another_names,
            description: data.description,
            publication_year: data.issue_year,
            age_limit: data.age_limit.and_then(|a| age_limit(a.code())),
            status: data.status.and_then(|s| status(&s.name)),
            is_licensed: data.is_licensed.unwrap_or(false),
            genres: data.genres.into_iter().map(|g| g.name).collect(),
            tags: data.categories.into_iter().map(|c| c.name).collect(),
            cover_links,
            original_language: data.title_type.and_then(|t| original_language(&t.name)),
            branches: data
                .branches
                .into_iter()
                .map(|b| BranchDeclaration {
                    id: b.id,
                    chapters_count: b.count_chapters,
                })
                .collect(),
        })
    }

    fn chapter_page_url(&self, branch_id: u64, page: u32) -> String {
        format!(
            "{}/api/v2/titles/chapters/?branch_id={}&ordering=-index&page={}",
            self.base(),
            branch_id,
            page
        )
    }

    fn parse_chapter_page(&self, body: &str) -> Result<Vec<ChapterEntry>, MappingError> {
        let page: ChapterPage = serde_json::from_str(body)?;

        Ok(page
            .results
            .into_iter()
            .map(|c| ChapterEntry {
                id: c.id,
                volume: value_to_string(&c.tome),
                number: value_to_string(&c.chapter),
                name: c.name,
                is_paid: c.is_paid,
                workers: c.publishers.into_iter().map(|p| p.name).collect(),
                free_publication_date: c.delay_pub_date.filter(|d| !d.is_null()),
            })
            .collect())
    }

    fn chapter_content_url(&self, chapter_id: u64) -> String {
        format!("{}/api/v2/titles/chapters/{}", self.base(), chapter_id)
    }

    fn parse_chapter_content(&self, body: &str) -> Result<Option<String>, MappingError> {
        let content: ChapterContent = serde_json::from_str(body)?;
        Ok(match content.content {
            Some(Value::String(html)) => Some(html),
            _ => None,
        })
    }

    fn catalog_url(&self, page: u32, filters: Option<&str>) -> String {
        let mut url = format!(
            "{}/api/search/catalog/?page={}&count={}&ordering=-id",
            self.base(),
            page,
            CATALOG_PAGE_SIZE
        );
        if let Some(filters) = filters.map(|f| f.trim_start_matches(['&', '?'])) {
            if !filters.is_empty() {
                url.push('&');
                url.push_str(filters);
            }
        }
        url
    }

    fn parse_catalog_page(&self, body: &str) -> Result<Vec<String>, MappingError> {
        let page: ListingPage<CatalogItem> = serde_json::from_str(body)?;
        Ok(page.content.into_iter().map(|item| item.dir).collect())
    }

    fn updates_url(&self, page: u32) -> String {
        format!(
            "{}/api/titles/last-chapters/?page={}&count={}",
            self.base(),
            page,
            UPDATES_PAGE_SIZE
        )
    }

    fn parse_updates_page(&self, body: &str) -> Result<Vec<UpdateEntry>, MappingError> {
        let page: ListingPage<UpdateItem> = serde_json::from_str(body)?;
        Ok(page
            .content
            .into_iter()
            .map(|item| UpdateEntry {
                slug: item.dir,
                uploaded_at: item.upload_date,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dialect() -> RemangaDialect {
        RemangaDialect::new("remanga.org")
    }

    #[test]
    fn test_urls() {
        let d = dialect();
        assert_eq!(d.title_url("abc"), "https://remanga.org/api/v2/titles/abc/");
        assert_eq!(
            d.chapter_page_url(7, 2),
            "https://remanga.org/api/v2/titles/chapters/?branch_id=7&ordering=-index&page=2"
        );
        assert_eq!(
            d.chapter_content_url(99),
            "https://remanga.org/api/v2/titles/chapters/99"
        );
        assert_eq!(
            d.updates_url(3),
            "https://remanga.org/api/titles/last-chapters/?page=3&count=20"
        );
    }

    #[test]
    fn test_catalog_url_filters() {
        let d = dialect();
        assert_eq!(
            d.catalog_url(1, None),
            "https://remanga.org/api/search/catalog/?page=1&count=30&ordering=-id"
        );
        assert_eq!(
            d.catalog_url(2, Some("&genres=5")),
            "https://remanga.org/api/search/catalog/?page=2&count=30&ordering=-id&genres=5"
        );
    }

    #[test]
    fn test_parse_title_maps_fields() {
        let body = json!({
            "id": 42,
            "main_name": "Поднятие уровня (Новелла)",
            "secondary_name": "Solo Leveling (Novel)",
            "another_name": "Na Honjaman Level Up / 나 혼자만 레벨업 / ",
            "cover": {"high": "/media/titles/sl/high.jpg", "mid": "/media/titles/sl/mid.jpg", "low": "/media/None"},
            "description": "<p>Описание</p>",
            "issue_year": 2016,
            "age_limit": {"id": 1, "name": "16+"},
            "status": {"id": 1, "name": "Закончен"},
            "type": {"id": 2, "name": "Корея"},
            "is_licensed": true,
            "genres": [{"id": 1, "name": "Экшен"}],
            "categories": [{"id": 2, "name": "Система"}],
            "branches": [{"id": 10, "count_chapters": 270}]
        })
        .to_string();

        let data = dialect().parse_title(&body).unwrap();
        assert_eq!(data.id, 42);
        assert_eq!(data.localized_name.as_deref(), Some("Поднятие уровня"));
        assert_eq!(data.eng_name.as_deref(), Some("Solo Leveling"));
        assert_eq!(data.another_names, vec!["Na Honjaman Level Up", "나 혼자만 레벨업"]);
        assert_eq!(
            data.cover_links,
            vec![
                "https://remanga.org/media/titles/sl/high.jpg",
                "https://remanga.org/media/titles/sl/mid.jpg"
            ]
        );
        assert_eq!(data.publication_year, Some(2016));
        assert_eq!(data.age_limit, Some(16));
        assert_eq!(data.status, Some(TitleStatus::Completed));
        assert_eq!(data.original_language.as_deref(), Some("kor"));
        assert!(data.is_licensed);
        assert_eq!(data.genres, vec!["Экшен"]);
        assert_eq!(data.tags, vec!["Система"]);
        assert_eq!(
            data.branches,
            vec![BranchDeclaration { id: 10, chapters_count: 270 }]
        );
    }

    #[test]
    fn test_parse_title_minimal() {
        let data = dialect()
            .parse_title(r#"{"id": 1, "age_limit": 2, "type": {"name": "Прочее"}}"#)
            .unwrap();
        assert_eq!(data.age_limit, Some(18));
        assert!(data.original_language.is_none());
        assert!(data.cover_links.is_empty());
        assert!(data.branches.is_empty());
    }

    #[test]
    fn test_parse_title_rejects_garbage() {
        assert!(dialect().parse_title("<html>").is_err());
        assert!(dialect().parse_title(r#"{"main_name": "no id"}"#).is_err());
    }

    #[test]
    fn test_parse_chapter_page() {
        let body = json!({
            "results": [
                {"id": 3, "tome": 1, "chapter": "12.5", "name": "Пролог", "is_paid": true,
                 "publishers": [{"name": "Team A"}], "delay_pub_date": "2024-05-01T00:00:00"},
                {"id": 2, "tome": 1, "chapter": "12", "name": "", "is_paid": false,
                 "publishers": [], "delay_pub_date": null}
            ]
        })
        .to_string();

        let entries = dialect().parse_chapter_page(&body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].volume.as_deref(), Some("1"));
        assert_eq!(entries[0].number.as_deref(), Some("12.5"));
        assert_eq!(entries[0].workers, vec!["Team A"]);
        assert_eq!(entries[0].free_publication_date, Some(json!("2024-05-01T00:00:00")));
        assert!(entries[1].free_publication_date.is_none());
    }

    #[test]
    fn test_parse_chapter_content() {
        let d = dialect();
        assert_eq!(
            d.parse_chapter_content(r#"{"id": 1, "content": "<p>x</p>"}"#).unwrap(),
            Some("<p>x</p>".to_string())
        );
        assert_eq!(d.parse_chapter_content(r#"{"id": 1}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_listings() {
        let d = dialect();
        let catalog = d
            .parse_catalog_page(r#"{"content": [{"dir": "a"}, {"dir": "b"}]}"#)
            .unwrap();
        assert_eq!(catalog, vec!["a", "b"]);

        let results = d.parse_catalog_page(r#"{"results": [{"dir": "c"}]}"#).unwrap();
        assert_eq!(results, vec!["c"]);

        let updates = d
            .parse_updates_page(r#"{"content": [{"dir": "a", "upload_date": 1700000000000}]}"#)
            .unwrap();
        assert_eq!(
            updates,
            vec![UpdateEntry { slug: "a".to_string(), uploaded_at: 1_700_000_000_000 }]
        );
    }
}
