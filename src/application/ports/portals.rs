//! Portals Port - 采集事件通知
//!
//! 单向通知，不影响控制流。具体实现见 infrastructure/events

use serde::{Deserialize, Serialize};

/// 采集过程中的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum AcquisitionEvent {
    /// 请求失败（非 200 或传输错误）
    RequestError {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        message: String,
    },
    /// 章节被跳过（付费墙）
    ChapterSkipped {
        title_slug: String,
        chapter_id: u64,
    },
    /// 作品不存在
    TitleNotFound {
        title_slug: String,
    },
    /// 封面被判定为占位图并全部丢弃
    CoversUnstubbed {
        title_slug: String,
    },
    /// 目录 / 更新流收集进度
    CollectProgress {
        page: u32,
        collected: usize,
    },
}

impl AcquisitionEvent {
    pub fn request_error(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RequestError {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionEvent::RequestError { .. } => "request_error",
            AcquisitionEvent::ChapterSkipped { .. } => "chapter_skipped",
            AcquisitionEvent::TitleNotFound { .. } => "title_not_found",
            AcquisitionEvent::CoversUnstubbed { .. } => "covers_unstubbed",
            AcquisitionEvent::CollectProgress { .. } => "collect_progress",
        }
    }
}

/// Portals Port
pub trait PortalsPort: Send + Sync {
    fn publish(&self, event: AcquisitionEvent);
}
