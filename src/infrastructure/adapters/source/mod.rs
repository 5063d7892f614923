//! Source Adapter - 站点方言实现

mod remanga;

pub use remanga::{RemangaDialect, CATALOG_PAGE_SIZE, CHAPTERS_PAGE_SIZE, UPDATES_PAGE_SIZE};

use crate::application::ports::SourceDialect;

/// 按站点域名选择方言
pub fn dialect_for_site(site: &str) -> Option<Box<dyn SourceDialect>> {
    match site {
        "remanga.org" | "renovels.org" => Some(Box::new(RemangaDialect::new(site))),
        _ => None,
    }
}
