//! Ranobe - 轻小说采集命令行
//!
//! - parse: 解析作品（可选抓取正文），输出 JSON
//! - collect: 收集目录中的作品标识
//! - updates: 收集最近有更新的作品标识

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use ranobe::application::{
    AcquireTitle, AcquireTitleHandler, AcquisitionOptions, AmendChapterHandler, CollectCatalog,
    CollectCatalogHandler, CollectUpdates, CollectUpdatesHandler, CoverStubDetector,
    ParseTitleHandler, PortalsPort, SourceDialect, TransportPort,
};
use ranobe::config::{load_config_from_path, print_config, AppConfig};
use ranobe::infrastructure::adapters::{
    dialect_for_site, DirectoryStubLibrary, HttpDownloader, HttpDownloaderConfig, HttpTransport,
    HttpTransportConfig,
};
use ranobe::infrastructure::events::EventPublisher;

#[derive(Parser)]
#[command(name = "ranobe", about = "Ranobe acquisition pipeline")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a title and print it as JSON
    Parse {
        slug: String,
        /// Also fetch chapter content
        #[arg(long)]
        content: bool,
    },
    /// Collect title slugs from the catalog
    Collect {
        /// Extra catalog query, e.g. "genres=3"
        #[arg(short, long)]
        filters: Option<String>,
        /// Max pages to request
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,
    },
    /// Collect slugs of titles updated within the last N hours
    Updates {
        #[arg(long, default_value = "24")]
        hours: u32,
    },
}

/// 初始化日志：环境变量优先，其次配置文件
fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},ranobe={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    print_config(&config);

    let dialect: Arc<dyn SourceDialect> = dialect_for_site(&config.source.site)
        .map(Arc::from)
        .ok_or_else(|| anyhow::anyhow!("Unsupported site: {}", config.source.site))?;

    let transport_config = HttpTransportConfig {
        timeout_secs: config.common.timeout_secs,
        max_retries: config.common.retries,
        ..Default::default()
    }
    .with_token(config.custom.token.clone())
    .with_proxy(config.proxy.url());
    let transport: Arc<dyn TransportPort> = Arc::new(HttpTransport::new(transport_config)?);

    let portals: Arc<dyn PortalsPort> = EventPublisher::new().arc();
    let delay = config.common.delay();

    match cli.command {
        Commands::Parse { slug, content } => {
            let options = AcquisitionOptions {
                has_token: config.custom.has_token(),
                add_free_publication_date: config.custom.add_free_publication_date,
                unstub: config.custom.unstub,
                delay,
            };

            let mut parse_handler =
                ParseTitleHandler::new(dialect.clone(), transport.clone(), portals.clone(), &options);
            if options.unstub {
                let downloader = HttpDownloader::new(
                    HttpDownloaderConfig::new(&config.covers.scratch_dir)
                        .with_timeout(config.common.timeout_secs)
                        .with_proxy(config.proxy.url()),
                )?;
                let stubs = DirectoryStubLibrary::new(&config.covers.stubs_dir);
                parse_handler = parse_handler
                    .with_cover_detector(CoverStubDetector::new(Arc::new(downloader), Arc::new(stubs)));
            }

            let amend_handler =
                AmendChapterHandler::new(dialect, transport, portals, options.has_token);
            let handler = AcquireTitleHandler::new(parse_handler, amend_handler);

            let response = handler
                .handle(AcquireTitle {
                    slug,
                    with_content: content,
                })
                .await?;

            println!("{}", serde_json::to_string_pretty(&response.title)?);
        }
        Commands::Collect { filters, pages } => {
            let handler = CollectCatalogHandler::new(dialect, transport, portals, delay);
            for slug in handler.handle(CollectCatalog { filters, pages }).await? {
                println!("{}", slug);
            }
        }
        Commands::Updates { hours } => {
            let handler = CollectUpdatesHandler::new(dialect, transport, portals, delay);
            for slug in handler
                .handle(CollectUpdates {
                    period_hours: hours,
                })
                .await?
            {
                println!("{}", slug);
            }
        }
    }

    Ok(())
}
