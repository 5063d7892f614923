//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（ranobe.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["ranobe", "ranobe.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `RANOBE_`，层级分隔符 `__`）
/// 2. 配置文件（ranobe.toml 或 ranobe.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `RANOBE_SOURCE__SITE=remanga.org`
/// - `RANOBE_COMMON__DELAY=2.5`
/// - `RANOBE_CUSTOM__TOKEN=...`
/// - `RANOBE_PROXY__ENABLE=true`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("source.site", "remanga.org")?
        .set_default("common.delay", 1.0)?
        .set_default("common.retries", 1)?
        .set_default("common.timeout_secs", 30)?
        .set_default("custom.add_free_publication_date", false)?
        .set_default("custom.unstub", false)?
        .set_default("proxy.enable", false)?
        .set_default("covers.stubs_dir", "stubs")?
        .set_default("covers.scratch_dir", "temp")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: RANOBE_CUSTOM__TOKEN=abc
    builder = builder.add_source(
        Environment::with_prefix("RANOBE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.source.site.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Source site cannot be empty".to_string(),
        ));
    }

    if !config.common.delay.is_finite() || config.common.delay < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "Delay must be a non-negative number of seconds, got {}",
            config.common.delay
        )));
    }

    if config.common.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Request timeout cannot be 0".to_string(),
        ));
    }

    if config.proxy.enable && (config.proxy.host.is_empty() || config.proxy.port.is_none()) {
        return Err(ConfigError::ValidationError(
            "Proxy host and port are required when proxy is enabled".to_string(),
        ));
    }

    if config.custom.unstub && config.covers.stubs_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Stubs directory is required when unstub is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Site: {}", config.source.site);
    tracing::info!("Delay: {}s", config.common.delay);
    tracing::info!("Retries: {}", config.common.retries);
    tracing::info!("Timeout: {}s", config.common.timeout_secs);
    tracing::info!(
        "Token: {}",
        if config.custom.has_token() { "***" } else { "(none)" }
    );
    tracing::info!(
        "Free Publication Date: {}",
        config.custom.add_free_publication_date
    );
    tracing::info!("Unstub: {}", config.custom.unstub);
    if config.custom.unstub {
        tracing::info!("Stubs Directory: {:?}", config.covers.stubs_dir);
    }
    tracing::info!("Proxy Enabled: {}", config.proxy.enable);
    if config.proxy.enable {
        tracing::info!(
            "Proxy: {}:{}",
            config.proxy.host,
            config.proxy.port.unwrap_or_default()
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_site() {
        let mut config = AppConfig::default();
        config.source.site = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_negative_delay() {
        let mut config = AppConfig::default();
        config.common.delay = -1.0;
        assert!(validate_config(&config).is_err());

        config.common.delay = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.common.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_incomplete_proxy() {
        let mut config = AppConfig::default();
        config.proxy.enable = true;
        config.proxy.host = "127.0.0.1".to_string();
        assert!(validate_config(&config).is_err());

        config.proxy.port = Some(8080);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ranobe.toml");
        std::fs::write(
            &path,
            r#"
[source]
site = "renovels.org"

[common]
delay = 0.5

[custom]
token = "secret"
unstub = true
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(path.as_path())).unwrap();
        assert_eq!(config.source.site, "renovels.org");
        assert_eq!(config.common.delay, 0.5);
        assert_eq!(config.common.retries, 1);
        assert!(config.custom.has_token());
        assert!(config.custom.unstub);
        assert_eq!(config.covers.scratch_dir, std::path::PathBuf::from("temp"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config_from_path(Some(path.as_path())).is_err());
    }
}
