//! Catalog Commands

/// 收集目录中的作品标识
#[derive(Debug, Clone, Default)]
pub struct CollectCatalog {
    /// 附加到目录 URL 的查询参数
    pub filters: Option<String>,
    /// 最多请求的页数，`None` 表示直到空页，`Some(0)` 不发请求
    pub pages: Option<u32>,
}

/// 收集最近一段时间内有更新的作品标识
#[derive(Debug, Clone)]
pub struct CollectUpdates {
    pub period_hours: u32,
}
