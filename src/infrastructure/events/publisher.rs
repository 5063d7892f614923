//! Event Publisher Implementation
//!
//! 采集事件：写入结构化日志，并广播给订阅者

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{AcquisitionEvent, PortalsPort};

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<AcquisitionEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<AcquisitionEvent> {
        self.channel.subscribe()
    }

    fn log(event: &AcquisitionEvent) {
        match event {
            AcquisitionEvent::RequestError { url, status, message } => {
                tracing::error!(url = %url, status = ?status, message = %message, "Request error");
            }
            AcquisitionEvent::ChapterSkipped { title_slug, chapter_id } => {
                tracing::info!(title = %title_slug, chapter_id = chapter_id, "Chapter skipped");
            }
            AcquisitionEvent::TitleNotFound { title_slug } => {
                tracing::warn!(title = %title_slug, "Title not found");
            }
            AcquisitionEvent::CoversUnstubbed { title_slug } => {
                tracing::info!(title = %title_slug, "Stub covers removed");
            }
            AcquisitionEvent::CollectProgress { page, collected } => {
                tracing::info!(page = page, collected = collected, "Collect progress");
            }
        }
    }
}

impl PortalsPort for EventPublisher {
    fn publish(&self, event: AcquisitionEvent) {
        Self::log(&event);

        if let Err(e) = self.channel.send(event) {
            tracing::trace!(
                event = e.0.as_str(),
                "Failed to publish event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
