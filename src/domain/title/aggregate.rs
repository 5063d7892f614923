//! Title Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{Branch, Cover, TitleStatus};

/// Title 聚合根
///
/// 不变量:
/// - 仅在一次采集过程中由编排器通过 setter 修改
/// - Branch 按源站顺序追加
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    site: Option<String>,
    id: Option<u64>,
    slug: String,
    localized_name: Option<String>,
    eng_name: Option<String>,
    another_names: Vec<String>,
    description: Option<String>,
    publication_year: Option<u32>,
    age_limit: Option<u8>,
    status: Option<TitleStatus>,
    is_licensed: Option<bool>,
    genres: Vec<String>,
    tags: Vec<String>,
    covers: Vec<Cover>,
    original_language: Option<String>,
    content_language: Option<String>,
    branches: Vec<Branch>,
}

impl Title {
    /// 以 slug 创建空的 Title
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            site: None,
            id: None,
            slug: slug.into(),
            localized_name: None,
            eng_name: None,
            another_names: Vec::new(),
            description: None,
            publication_year: None,
            age_limit: None,
            status: None,
            is_licensed: None,
            genres: Vec::new(),
            tags: Vec::new(),
            covers: Vec::new(),
            original_language: None,
            content_language: None,
            branches: Vec::new(),
        }
    }

    pub fn set_site(&mut self, site: impl Into<String>) {
        self.site = Some(site.into());
    }

    pub fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub fn set_localized_name(&mut self, name: Option<String>) {
        self.localized_name = name;
    }

    pub fn set_eng_name(&mut self, name: Option<String>) {
        self.eng_name = name;
    }

    pub fn set_another_names(&mut self, names: Vec<String>) {
        self.another_names = names;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_publication_year(&mut self, year: Option<u32>) {
        self.publication_year = year;
    }

    pub fn set_age_limit(&mut self, age_limit: Option<u8>) {
        self.age_limit = age_limit;
    }

    pub fn set_status(&mut self, status: Option<TitleStatus>) {
        self.status = status;
    }

    pub fn set_is_licensed(&mut self, is_licensed: bool) {
        self.is_licensed = Some(is_licensed);
    }

    pub fn set_genres(&mut self, genres: Vec<String>) {
        self.genres = genres;
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    pub fn set_covers(&mut self, covers: Vec<Cover>) {
        self.covers = covers;
    }

    pub fn set_original_language(&mut self, language: Option<String>) {
        self.original_language = language;
    }

    pub fn set_content_language(&mut self, language: impl Into<String>) {
        self.content_language = Some(language.into());
    }

    pub fn add_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
    }

    // Getters
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn localized_name(&self) -> Option<&str> {
        self.localized_name.as_deref()
    }

    pub fn eng_name(&self) -> Option<&str> {
        self.eng_name.as_deref()
    }

    pub fn another_names(&self) -> &[String] {
        &self.another_names
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn publication_year(&self) -> Option<u32> {
        self.publication_year
    }

    pub fn age_limit(&self) -> Option<u8> {
        self.age_limit
    }

    pub fn status(&self) -> Option<TitleStatus> {
        self.status
    }

    pub fn is_licensed(&self) -> Option<bool> {
        self.is_licensed
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn covers(&self) -> &[Cover] {
        &self.covers
    }

    pub fn original_language(&self) -> Option<&str> {
        self.original_language.as_deref()
    }

    pub fn content_language(&self) -> Option<&str> {
        self.content_language.as_deref()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branches_mut(&mut self) -> &mut [Branch] {
        &mut self.branches
    }

    /// 所有分支的章节总数
    pub fn chapter_count(&self) -> usize {
        self.branches.iter().map(Branch::chapter_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::title::Chapter;

    #[test]
    fn test_title_creation() {
        let title = Title::new("solo-leveling");
        assert_eq!(title.slug(), "solo-leveling");
        assert!(title.branches().is_empty());
        assert!(title.id().is_none());
    }

    #[test]
    fn test_chapter_count_spans_branches() {
        let mut title = Title::new("x");
        let mut first = Branch::new(1);
        first.add_chapter(Chapter::new(1));
        first.add_chapter(Chapter::new(2));
        let mut second = Branch::new(2);
        second.add_chapter(Chapter::new(3));
        title.add_branch(first);
        title.add_branch(second);

        assert_eq!(title.chapter_count(), 3);
    }

    #[test]
    fn test_title_serializes_branches() {
        let mut title = Title::new("x");
        title.add_branch(Branch::new(5));
        let value = serde_json::to_value(&title).unwrap();
        assert_eq!(value["branches"][0]["id"], 5);
        assert_eq!(value["slug"], "x");
    }
}
