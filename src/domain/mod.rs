//! Domain Layer - 领域层
//!
//! 包含:
//! - Title Context: 作品 / 分支 / 章节 / 段落模型
//! - 章节类型分类器（有序规则表）
//! - 正文规范化（HTML → 段落）
//! - 结构相似度（封面占位图比对）

pub mod title;

mod chapter_classifier;
mod content_normalizer;
mod similarity;

pub use chapter_classifier::{ChapterClassifier, ClassifierRule, NamePredicate, DEFAULT_RULES};
pub use content_normalizer::normalize_content;
pub use similarity::{difference_percent, structural_similarity, SimilarityError};
pub use title::{Branch, Chapter, ChapterType, Cover, Paragraph, Title, TitleStatus};
