//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod downloader;
mod portals;
mod source_dialect;
mod stub_library;
mod transport;

pub use downloader::{DownloadError, DownloaderPort};
pub use portals::{AcquisitionEvent, PortalsPort};
pub use source_dialect::{
    BranchDeclaration, ChapterEntry, EpochUnit, MappingError, SourceDialect, TitleData,
    UpdateEntry,
};
pub use stub_library::{StubLibraryError, StubLibraryPort};
pub use transport::{TransportError, TransportPort, TransportResponse};
