//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Transport、SourceDialect、Portals、Downloader、StubLibrary）
//! - commands: 采集命令及处理器
//! - paginator: 分支章节分页
//! - cover_stub: 占位封面检测
//! - session: 采集会话与付费墙门闩
//! - error: 应用层错误定义

pub mod commands;
pub mod cover_stub;
pub mod error;
pub mod paginator;
pub mod ports;
pub mod session;

// Re-exports
pub use commands::{
    AcquireTitle,
    CollectCatalog,
    CollectUpdates,
    ParseTitle,
    // Handlers
    handlers::{
        clean_description, AcquireTitleHandler, AcquireTitleResponse, AcquisitionOptions,
        AmendChapterHandler, AmendOutcome, AmendReport, CollectCatalogHandler,
        CollectUpdatesHandler, ParseTitleHandler,
    },
};

pub use cover_stub::{CoverStubDetector, COVER_SLOT, DEFAULT_STUB_THRESHOLD};
pub use error::ApplicationError;
pub use paginator::{page_count, BranchPaginator, FREE_PUBLICATION_DATE_KEY};
pub use session::{AcquisitionSession, PaywallGate};

pub use ports::{
    // Transport
    TransportError,
    TransportPort,
    TransportResponse,
    // Source dialect
    BranchDeclaration,
    ChapterEntry,
    EpochUnit,
    MappingError,
    SourceDialect,
    TitleData,
    UpdateEntry,
    // Portals
    AcquisitionEvent,
    PortalsPort,
    // Covers
    DownloadError,
    DownloaderPort,
    StubLibraryError,
    StubLibraryPort,
};
