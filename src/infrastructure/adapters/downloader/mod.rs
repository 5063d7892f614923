//! Downloader Adapter

mod http_downloader;

pub use http_downloader::{HttpDownloader, HttpDownloaderConfig};
