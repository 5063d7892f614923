//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod downloader;
pub mod source;
pub mod stubs;
pub mod transport;

pub use downloader::*;
pub use source::*;
pub use stubs::*;
pub use transport::*;
