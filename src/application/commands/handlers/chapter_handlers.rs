//! Chapter Handlers - 章节正文补全

use std::sync::Arc;

use crate::application::ports::{AcquisitionEvent, PortalsPort, SourceDialect, TransportPort};
use crate::application::session::AcquisitionSession;
use crate::domain::{normalize_content, Chapter};

/// 单个章节的补全结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmendOutcome {
    /// 已写入 n 个段落
    Amended(usize),
    /// 付费章节且未配置访问令牌
    SkippedNoToken,
    /// 付费墙拒绝或正文缺失
    SkippedLocked,
    /// 请求失败
    Failed,
}

/// AmendChapter Handler
pub struct AmendChapterHandler {
    dialect: Arc<dyn SourceDialect>,
    transport: Arc<dyn TransportPort>,
    portals: Arc<dyn PortalsPort>,
    has_token: bool,
}

impl AmendChapterHandler {
    pub fn new(
        dialect: Arc<dyn SourceDialect>,
        transport: Arc<dyn TransportPort>,
        portals: Arc<dyn PortalsPort>,
        has_token: bool,
    ) -> Self {
        Self {
            dialect,
            transport,
            portals,
            has_token,
        }
    }

    fn skip_locked(&self, session: &mut AcquisitionSession, chapter: &Chapter) -> AmendOutcome {
        if chapter.is_paid() {
            session.gate_mut().trip();
        }
        self.portals.publish(AcquisitionEvent::ChapterSkipped {
            title_slug: session.title_slug().to_string(),
            chapter_id: chapter.id(),
        });
        AmendOutcome::SkippedLocked
    }

    /// 抓取并写入章节正文
    pub async fn handle(&self, session: &mut AcquisitionSession, chapter: &mut Chapter) -> AmendOutcome {
        if chapter.is_paid() && !self.has_token {
            return AmendOutcome::SkippedNoToken;
        }

        if chapter.is_paid() && session.gate().is_locked() {
            self.portals.publish(AcquisitionEvent::ChapterSkipped {
                title_slug: session.title_slug().to_string(),
                chapter_id: chapter.id(),
            });
            return AmendOutcome::SkippedLocked;
        }

        let url = self.dialect.chapter_content_url(chapter.id());
        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                self.portals
                    .publish(AcquisitionEvent::request_error(&url, None, e.to_string()));
                return AmendOutcome::Failed;
            }
        };

        if response.is_locked() {
            return self.skip_locked(session, chapter);
        }

        if !response.is_success() {
            self.portals.publish(AcquisitionEvent::request_error(
                &url,
                Some(response.status),
                "Unable to request chapter content",
            ));
            return AmendOutcome::Failed;
        }

        let html = match self.dialect.parse_chapter_content(&response.body) {
            Ok(Some(html)) => html,
            Ok(None) => return self.skip_locked(session, chapter),
            Err(e) => {
                self.portals.publish(AcquisitionEvent::request_error(
                    &url,
                    Some(response.status),
                    e.to_string(),
                ));
                return AmendOutcome::Failed;
            }
        };

        let paragraphs = normalize_content(&html);
        let count = paragraphs.len();
        for paragraph in paragraphs {
            chapter.add_paragraph(paragraph);
        }

        tracing::debug!(
            title = %session.title_slug(),
            chapter_id = chapter.id(),
            paragraphs = count,
            "Chapter amended"
        );

        AmendOutcome::Amended(count)
    }
}
