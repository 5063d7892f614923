//! Title Commands

/// 解析作品元数据与章节列表
#[derive(Debug, Clone)]
pub struct ParseTitle {
    pub slug: String,
}

/// 完整采集一个作品
#[derive(Debug, Clone)]
pub struct AcquireTitle {
    pub slug: String,
    /// 是否同时抓取每个章节的正文
    pub with_content: bool,
}
