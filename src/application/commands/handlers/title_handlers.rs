//! Title Handlers - 作品采集编排

use scraper::{Html, Node};
use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::{AcquireTitle, ParseTitle};
use crate::application::cover_stub::CoverStubDetector;
use crate::application::error::ApplicationError;
use crate::application::paginator::BranchPaginator;
use crate::application::ports::{
    AcquisitionEvent, PortalsPort, SourceDialect, TitleData, TransportPort,
};
use crate::application::session::AcquisitionSession;
use crate::domain::{Cover, Title};

use super::chapter_handlers::{AmendChapterHandler, AmendOutcome};

/// 正文语言
const CONTENT_LANGUAGE: &str = "rus";

/// 描述中视为换行的元素
const LINE_BREAK_TAGS: &[&str] = &["br", "p", "div", "li"];

/// 采集选项
#[derive(Debug, Clone, Default)]
pub struct AcquisitionOptions {
    /// 是否配置了访问令牌
    pub has_token: bool,
    /// 为付费章节记录转免费日期
    pub add_free_publication_date: bool,
    /// 剔除占位封面
    pub unstub: bool,
    /// 分页请求间隔
    pub delay: Duration,
}

/// 描述 HTML 转纯文本：去标签、去空行
pub fn clean_description(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let mut text = String::new();

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if LINE_BREAK_TAGS.contains(&e.name()) => text.push('\n'),
            _ => {}
        }
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

// ============================================================================
// ParseTitle
// ============================================================================

/// ParseTitle Handler - 元数据、封面与全部分支
pub struct ParseTitleHandler {
    dialect: Arc<dyn SourceDialect>,
    transport: Arc<dyn TransportPort>,
    portals: Arc<dyn PortalsPort>,
    paginator: BranchPaginator,
    cover_detector: Option<CoverStubDetector>,
    unstub: bool,
}

impl ParseTitleHandler {
    pub fn new(
        dialect: Arc<dyn SourceDialect>,
        transport: Arc<dyn TransportPort>,
        portals: Arc<dyn PortalsPort>,
        options: &AcquisitionOptions,
    ) -> Self {
        let paginator = BranchPaginator::new(
            dialect.clone(),
            transport.clone(),
            portals.clone(),
            options.delay,
        )
        .with_free_publication_date(options.add_free_publication_date);

        Self {
            dialect,
            transport,
            portals,
            paginator,
            cover_detector: None,
            unstub: options.unstub,
        }
    }

    pub fn with_cover_detector(mut self, detector: CoverStubDetector) -> Self {
        self.cover_detector = Some(detector);
        self
    }

    pub async fn handle(&self, command: ParseTitle) -> Result<Title, ApplicationError> {
        let slug = command.slug;
        let url = self.dialect.title_url(&slug);

        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                self.portals
                    .publish(AcquisitionEvent::request_error(&url, None, e.to_string()));
                return Err(e.into());
            }
        };

        if response.is_not_found() {
            self.portals.publish(AcquisitionEvent::TitleNotFound {
                title_slug: slug.clone(),
            });
            return Err(ApplicationError::title_not_found(slug));
        }

        if !response.is_success() {
            self.portals.publish(AcquisitionEvent::request_error(
                &url,
                Some(response.status),
                "Unable to request title data",
            ));
            return Err(ApplicationError::RequestFailed {
                url,
                status: response.status,
            });
        }

        let data = self.dialect.parse_title(&response.body)?;
        let mut title = self.build_title(&slug, &data);

        if self.unstub {
            self.unstub_covers(&mut title).await;
        }

        for declaration in &data.branches {
            let branch = self
                .paginator
                .collect(declaration.id, declaration.chapters_count)
                .await;
            title.add_branch(branch);
        }

        tracing::info!(
            title = %slug,
            branches = title.branches().len(),
            chapters = title.chapter_count(),
            "Title parsed"
        );

        Ok(title)
    }

    fn build_title(&self, slug: &str, data: &TitleData) -> Title {
        let mut title = Title::new(slug);
        title.set_site(self.dialect.site());
        title.set_id(data.id);
        title.set_original_language(data.original_language.clone());
        title.set_content_language(CONTENT_LANGUAGE);
        title.set_localized_name(data.localized_name.clone());
        title.set_eng_name(data.eng_name.clone());
        title.set_another_names(data.another_names.clone());
        title.set_covers(data.cover_links.iter().map(Cover::from_link).collect());
        title.set_publication_year(data.publication_year);
        title.set_description(data.description.as_deref().and_then(clean_description));
        title.set_age_limit(data.age_limit);
        title.set_status(data.status);
        title.set_is_licensed(data.is_licensed);
        title.set_genres(data.genres.clone());
        title.set_tags(data.tags.clone());
        title
    }

    /// 任一封面为占位图时丢弃全部封面
    async fn unstub_covers(&self, title: &mut Title) {
        let Some(detector) = &self.cover_detector else {
            return;
        };

        let links: Vec<String> = title.covers().iter().map(|c| c.link.clone()).collect();
        for link in &links {
            if detector.is_stub(link).await {
                title.set_covers(Vec::new());
                self.portals.publish(AcquisitionEvent::CoversUnstubbed {
                    title_slug: title.slug().to_string(),
                });
                return;
            }
        }
    }
}

// ============================================================================
// AcquireTitle
// ============================================================================

/// 正文补全统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmendReport {
    pub amended: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AmendReport {
    fn record(&mut self, outcome: AmendOutcome) {
        match outcome {
            AmendOutcome::Amended(_) => self.amended += 1,
            AmendOutcome::SkippedNoToken | AmendOutcome::SkippedLocked => self.skipped += 1,
            AmendOutcome::Failed => self.failed += 1,
        }
    }
}

/// 采集结果
#[derive(Debug, Clone)]
pub struct AcquireTitleResponse {
    pub title: Title,
    pub report: AmendReport,
}

/// AcquireTitle Handler - 单个作品的完整采集
pub struct AcquireTitleHandler {
    parse_handler: ParseTitleHandler,
    amend_handler: AmendChapterHandler,
}

impl AcquireTitleHandler {
    pub fn new(parse_handler: ParseTitleHandler, amend_handler: AmendChapterHandler) -> Self {
        Self {
            parse_handler,
            amend_handler,
        }
    }

    pub async fn handle(&self, command: AcquireTitle) -> Result<AcquireTitleResponse, ApplicationError> {
        let mut session = AcquisitionSession::start(command.slug.clone());

        let mut title = self
            .parse_handler
            .handle(ParseTitle { slug: command.slug })
            .await?;

        let mut report = AmendReport::default();
        if command.with_content {
            for branch in title.branches_mut() {
                for chapter in branch.chapters_mut() {
                    let outcome = self.amend_handler.handle(&mut session, chapter).await;
                    report.record(outcome);
                }
            }

            tracing::info!(
                title = %session.title_slug(),
                amended = report.amended,
                skipped = report.skipped,
                failed = report.failed,
                "Chapters amended"
            );
        }

        Ok(AcquireTitleResponse { title, report })
    }
}
