//! Title Context - Entities

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{ChapterType, Paragraph};

/// 章节
///
/// 不变量:
/// - id 在所属 Branch 内唯一
/// - paragraphs 顺序与源站输出顺序一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    id: u64,
    slug: String,
    volume: Option<String>,
    number: Option<String>,
    name: Option<String>,
    is_paid: bool,
    workers: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "type")]
    chapter_type: Option<ChapterType>,
    paragraphs: Vec<Paragraph>,
}

impl Chapter {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            slug: id.to_string(),
            volume: None,
            number: None,
            name: None,
            is_paid: false,
            workers: Vec::new(),
            extra: BTreeMap::new(),
            chapter_type: None,
            paragraphs: Vec::new(),
        }
    }

    pub fn set_volume(&mut self, volume: Option<String>) {
        self.volume = volume;
    }

    pub fn set_number(&mut self, number: Option<String>) {
        self.number = number;
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.is_empty());
    }

    pub fn set_is_paid(&mut self, is_paid: bool) {
        self.is_paid = is_paid;
    }

    pub fn set_workers(&mut self, workers: Vec<String>) {
        self.workers = workers;
    }

    pub fn set_type(&mut self, chapter_type: Option<ChapterType>) {
        self.chapter_type = chapter_type;
    }

    pub fn add_extra_data(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    // Getters
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    pub fn extra(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.extra
    }

    pub fn chapter_type(&self) -> Option<ChapterType> {
        self.chapter_type
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }
}

/// 分支 - 一条独立的翻译线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BranchRecord")]
pub struct Branch {
    id: u64,
    chapters: Vec<Chapter>,
    #[serde(skip)]
    chapter_ids: HashSet<u64>,
}

/// 反序列化时重建 id 索引
#[derive(Deserialize)]
struct BranchRecord {
    id: u64,
    chapters: Vec<Chapter>,
}

impl From<BranchRecord> for Branch {
    fn from(record: BranchRecord) -> Self {
        let mut branch = Branch::new(record.id);
        for chapter in record.chapters {
            branch.add_chapter(chapter);
        }
        branch
    }
}

impl Branch {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            chapters: Vec::new(),
            chapter_ids: HashSet::new(),
        }
    }

    /// 追加章节；id 已存在时丢弃并返回 false
    pub fn add_chapter(&mut self, chapter: Chapter) -> bool {
        if !self.chapter_ids.insert(chapter.id()) {
            return false;
        }
        self.chapters.push(chapter);
        true
    }

    pub fn contains(&self, chapter_id: u64) -> bool {
        self.chapter_ids.contains(&chapter_id)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapters_mut(&mut self) -> &mut [Chapter] {
        &mut self.chapters
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}
