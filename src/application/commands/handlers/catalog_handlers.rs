//! Catalog Handlers - 目录与更新流收集
//!
//! 与章节分页不同，这里的任何页级失败都会终止整个收集。

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::{CollectCatalog, CollectUpdates};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AcquisitionEvent, MappingError, PortalsPort, SourceDialect, TransportPort,
};

/// 请求并解析一个列表页，失败时上报事件
async fn fetch_listing<T>(
    transport: &dyn TransportPort,
    portals: &dyn PortalsPort,
    url: &str,
    page: u32,
    parse: impl FnOnce(&str) -> Result<T, MappingError>,
) -> Result<T, ApplicationError> {
    tracing::debug!(url = %url, page = page, "Requesting listing page");

    let response = match transport.get(url).await {
        Ok(response) => response,
        Err(e) => {
            portals.publish(AcquisitionEvent::request_error(url, None, e.to_string()));
            return Err(ApplicationError::collection_failed(page, e.to_string()));
        }
    };

    if !response.is_success() {
        portals.publish(AcquisitionEvent::request_error(
            url,
            Some(response.status),
            "Unable to request listing page",
        ));
        return Err(ApplicationError::collection_failed(
            page,
            format!("HTTP {}", response.status),
        ));
    }

    parse(&response.body).map_err(|e| {
        portals.publish(AcquisitionEvent::request_error(
            url,
            Some(response.status),
            e.to_string(),
        ));
        ApplicationError::collection_failed(page, e.to_string())
    })
}

/// 保序去重的标识集合
#[derive(Default)]
struct SlugCollector {
    seen: HashSet<String>,
    slugs: Vec<String>,
}

impl SlugCollector {
    fn push(&mut self, slug: String) {
        if self.seen.insert(slug.clone()) {
            self.slugs.push(slug);
        }
    }

    fn len(&self) -> usize {
        self.slugs.len()
    }

    fn into_vec(self) -> Vec<String> {
        self.slugs
    }
}

// ============================================================================
// CollectCatalog
// ============================================================================

/// CollectCatalog Handler
pub struct CollectCatalogHandler {
    dialect: Arc<dyn SourceDialect>,
    transport: Arc<dyn TransportPort>,
    portals: Arc<dyn PortalsPort>,
    delay: Duration,
}

impl CollectCatalogHandler {
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
            delay,
        }
    }

    pub async fn handle(&self, command: CollectCatalog) -> Result<Vec<String>, ApplicationError> {
        if command.pages == Some(0) {
            return Ok(Vec::new());
        }

        let mut collected = SlugCollector::default();
        let mut page = 1u32;

        loop {
            let url = self.dialect.catalog_url(page, command.filters.as_deref());
            let slugs = fetch_listing(
                self.transport.as_ref(),
                self.portals.as_ref(),
                &url,
                page,
                |body| self.dialect.parse_catalog_page(body),
            )
            .await?;

            if slugs.is_empty() {
                break;
            }

            for slug in slugs {
                collected.push(slug);
            }

            self.portals.publish(AcquisitionEvent::CollectProgress {
                page,
                collected: collected.len(),
            });

            if command.pages == Some(page) {
                break;
            }

            tokio::time::sleep(self.delay).await;
            page += 1;
        }

        tracing::info!(pages = page, collected = collected.len(), "Catalog collected");

        Ok(collected.into_vec())
    }
}

// ============================================================================
// CollectUpdates
// ============================================================================

/// CollectUpdates Handler
pub struct CollectUpdatesHandler {
    dialect: Arc<dyn SourceDialect>,
    transport: Arc<dyn TransportPort>,
    portals: Arc<dyn PortalsPort>,
    delay: Duration,
}

impl CollectUpdatesHandler {
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
            delay,
        }
    }

    pub async fn handle(&self, command: CollectUpdates) -> Result<Vec<String>, ApplicationError> {
        self.handle_at(command, Utc::now()).await
    }

    /// 以给定时间为 "现在" 收集
    pub async fn handle_at(
        &self,
        command: CollectUpdates,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, ApplicationError> {
        let unit = self.dialect.epoch_unit();
        let window = unit.from_hours(command.period_hours);
        let now = unit.timestamp(now);

        let mut collected = SlugCollector::default();
        let mut page = 1u32;

        loop {
            let url = self.dialect.updates_url(page);
            let entries = fetch_listing(
                self.transport.as_ref(),
                self.portals.as_ref(),
                &url,
                page,
                |body| self.dialect.parse_updates_page(body),
            )
            .await?;

            if entries.is_empty() {
                break;
            }

            // 同一页内乱序的较新条目仍然保留
            let mut complete = false;
            for entry in entries {
                if now - entry.uploaded_at <= window {
                    collected.push(entry.slug);
                } else {
                    complete = true;
                }
            }

            self.portals.publish(AcquisitionEvent::CollectProgress {
                page,
                collected: collected.len(),
            });

            if complete {
                break;
            }

            tokio::time::sleep(self.delay).await;
            page += 1;
        }

        tracing::info!(
            period_hours = command.period_hours,
            pages = page,
            collected = collected.len(),
            "Updates collected"
        );

        Ok(collected.into_vec())
    }
}
