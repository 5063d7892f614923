//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod catalog_handlers;
mod chapter_handlers;
mod title_handlers;

pub use catalog_handlers::*;
pub use chapter_handlers::*;
pub use title_handlers::*;
