//! Branch Paginator - 分支章节列表分页收集
//!
//! 按源站声明的章节数计算页数，逐页请求、分类、去重。
//! 单页失败只上报事件，不中断整个分支。

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AcquisitionEvent, ChapterEntry, PortalsPort, SourceDialect, TransportPort,
};
use crate::domain::{Branch, Chapter, ChapterClassifier};

/// 付费章节转免费日期的扩展字段名
pub const FREE_PUBLICATION_DATE_KEY: &str = "free-publication-date";

/// 需要请求的页数
pub fn page_count(declared_count: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    declared_count.div_ceil(page_size)
}

/// 分支分页器
pub struct BranchPaginator {
    dialect: Arc<dyn SourceDialect>,
    transport: Arc<dyn TransportPort>,
    portals: Arc<dyn PortalsPort>,
    classifier: ChapterClassifier,
    delay: Duration,
    add_free_publication_date: bool,
}

impl BranchPaginator {
    pub fn new(
        dialect: Arc<dyn SourceDialect>,
        transport: Arc<dyn TransportPort>,
        portals: Arc<dyn PortalsPort>,
        delay: Duration,
    ) -> Self {
        Self {
            dialect,
            transport,
            portals,
            classifier: ChapterClassifier::default(),
            delay,
            add_free_publication_date: false,
        }
    }

    pub fn with_classifier(mut self, classifier: ChapterClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_free_publication_date(mut self, enabled: bool) -> Self {
        self.add_free_publication_date = enabled;
        self
    }

    /// 收集一个分支的全部章节
    pub async fn collect(&self, branch_id: u64, declared_count: u32) -> Branch {
        let mut branch = Branch::new(branch_id);
        let pages = page_count(declared_count, self.dialect.chapter_page_size());

        for page in 1..=pages {
            if let Some(entries) = self.fetch_page(branch_id, page).await {
                let mut duplicates = 0usize;
                for entry in entries {
                    if branch.contains(entry.id) {
                        duplicates += 1;
                        continue;
                    }
                    branch.add_chapter(self.build_chapter(entry));
                }

                tracing::debug!(
                    branch_id = branch_id,
                    page = page,
                    pages = pages,
                    duplicates = duplicates,
                    "Chapter page collected"
                );
            }

            if page < pages {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::info!(
            branch_id = branch_id,
            declared = declared_count,
            collected = branch.chapter_count(),
            "Branch collected"
        );

        branch
    }

    async fn fetch_page(&self, branch_id: u64, page: u32) -> Option<Vec<ChapterEntry>> {
        let url = self.dialect.chapter_page_url(branch_id, page);

        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                self.portals
                    .publish(AcquisitionEvent::request_error(&url, None, e.to_string()));
                return None;
            }
        };

        if !response.is_success() {
            self.portals.publish(AcquisitionEvent::request_error(
                &url,
                Some(response.status),
                "Unable to request chapter list page",
            ));
            return None;
        }

        match self.dialect.parse_chapter_page(&response.body) {
            Ok(entries) => Some(entries),
            Err(e) => {
                self.portals.publish(AcquisitionEvent::request_error(
                    &url,
                    Some(response.status),
                    e.to_string(),
                ));
                None
            }
        }
    }

    fn build_chapter(&self, entry: ChapterEntry) -> Chapter {
        let mut chapter = Chapter::new(entry.id);
        chapter.set_type(self.classifier.classify(entry.name.as_deref()));
        chapter.set_volume(entry.volume);
        chapter.set_number(entry.number);
        chapter.set_name(entry.name);
        chapter.set_is_paid(entry.is_paid);
        chapter.set_workers(entry.workers);

        if self.add_free_publication_date && entry.is_paid {
            if let Some(date) = entry.free_publication_date {
                chapter.add_extra_data(FREE_PUBLICATION_DATE_KEY, date);
            }
        }

        chapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChapterType;
    use crate::infrastructure::adapters::{RemangaDialect, ScriptedTransport};
    use crate::infrastructure::events::EventPublisher;
    use serde_json::json;

    fn chapter_json(id: u64, name: &str, is_paid: bool) -> serde_json::Value {
        json!({
            "id": id, "tome": 1, "chapter": id.to_string(), "name": name,
            "is_paid": is_paid, "publishers": [], "delay_pub_date": "2030-01-01T00:00:00"
        })
    }

    fn page(ids: std::ops::RangeInclusive<u64>) -> serde_json::Value {
        json!({ "results": ids.map(|id| chapter_json(id, "", false)).collect::<Vec<_>>() })
    }

    struct Fixture {
        dialect: Arc<RemangaDialect>,
        transport: Arc<ScriptedTransport>,
        events: Arc<EventPublisher>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dialect: Arc::new(RemangaDialect::new("remanga.org")),
                transport: Arc::new(ScriptedTransport::new()),
                events: EventPublisher::new().arc(),
            }
        }

        fn paginator(&self, delay: Duration) -> BranchPaginator {
            BranchPaginator::new(
                self.dialect.clone(),
                self.transport.clone(),
                self.events.clone(),
                delay,
            )
        }

        fn page_url(&self, page: u32) -> String {
            self.dialect.chapter_page_url(7, page)
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 50), 0);
        assert_eq!(page_count(1, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);
        assert_eq!(page_count(120, 50), 3);
        assert_eq!(page_count(10, 0), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_pages_with_delay_between_only() {
        let fx = Fixture::new();
        fx.transport
            .respond_json(&fx.page_url(1), 200, &page(71..=120))
            .respond_json(&fx.page_url(2), 200, &page(21..=70))
            .respond_json(&fx.page_url(3), 200, &page(1..=20));

        let started = tokio::time::Instant::now();
        let branch = fx.paginator(Duration::from_secs(1)).collect(7, 120).await;
        let finished = tokio::time::Instant::now();

        assert_eq!(branch.chapter_count(), 120);
        let calls = fx.transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].at - started, Duration::ZERO);
        assert_eq!(calls[1].at - calls[0].at, Duration::from_secs(1));
        assert_eq!(calls[2].at - calls[1].at, Duration::from_secs(1));
        assert_eq!(finished - calls[2].at, Duration::ZERO);
        assert_eq!(finished - started, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_zero_declared_chapters_requests_nothing() {
        let fx = Fixture::new();
        let branch = fx.paginator(Duration::ZERO).collect(7, 0).await;

        assert_eq!(branch.chapter_count(), 0);
        assert_eq!(fx.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_pages_are_deduplicated() {
        let fx = Fixture::new();
        fx.transport
            .respond_json(&fx.page_url(1), 200, &page(5..=10))
            .respond_json(&fx.page_url(2), 200, &page(1..=6));

        let paginator = BranchPaginator::new(
            fx.dialect.clone(),
            fx.transport.clone(),
            fx.events.clone(),
            Duration::ZERO,
        );
        let branch = paginator.collect(7, 51).await;

        let ids: Vec<u64> = branch.chapters().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![5, 6, 7, 8, 9, 10, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_failed_page_is_reported_and_skipped() {
        let fx = Fixture::new();
        let mut rx = fx.events.subscribe();
        fx.transport
            .respond(&fx.page_url(1), 500, "")
            .respond_json(&fx.page_url(2), 200, &page(1..=3))
            .respond(&fx.page_url(3), 200, "not json");

        let branch = fx.paginator(Duration::ZERO).collect(7, 150).await;

        assert_eq!(branch.chapter_count(), 3);
        assert_eq!(fx.transport.call_count(), 3);

        let first = rx.try_recv().unwrap();
        assert!(matches!(
            first,
            AcquisitionEvent::RequestError { status: Some(500), .. }
        ));
        let second = rx.try_recv().unwrap();
        assert_eq!(second.as_str(), "request_error");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_chapters_are_classified_and_dated() {
        let fx = Fixture::new();
        fx.transport.respond_json(
            &fx.page_url(1),
            200,
            &json!({ "results": [
                chapter_json(2, "Эпилог", true),
                chapter_json(1, "Пролог", false),
            ]}),
        );

        let branch = fx
            .paginator(Duration::ZERO)
            .with_free_publication_date(true)
            .collect(7, 2)
            .await;

        let chapters = branch.chapters();
        assert_eq!(chapters[0].chapter_type(), Some(ChapterType::Epilogue));
        assert_eq!(chapters[1].chapter_type(), Some(ChapterType::Prologue));
        assert_eq!(
            chapters[0].extra().get(FREE_PUBLICATION_DATE_KEY),
            Some(&json!("2030-01-01T00:00:00"))
        );
        assert!(chapters[1].extra().is_empty());
    }
}
