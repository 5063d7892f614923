//! Title Context - 作品限界上下文
//!
//! 职责:
//! - Title 聚合
//! - Branch / Chapter 实体
//! - 段落、封面、章节类型等值对象

mod aggregate;
mod entities;
mod value_objects;

pub use aggregate::Title;
pub use entities::{Branch, Chapter};
pub use value_objects::{ChapterType, Cover, Paragraph, TitleStatus};
