//! 应用层 - 命令
//!
//! 采集相关的所有命令

mod catalog_commands;
mod title_commands;

pub mod handlers;

pub use catalog_commands::*;
pub use title_commands::*;
