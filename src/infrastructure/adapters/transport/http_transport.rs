//! HTTP Transport - 基于 reqwest 的 Transport 实现
//!
//! - 浏览器风格的默认请求头
//! - 可选代理与访问令牌（`Authorization: bearer <token>`）
//! - 连接错误、429、5xx 时指数退避重试

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::{Client, Proxy, StatusCode};
use std::time::Duration;

use crate::application::ports::{TransportError, TransportPort, TransportResponse};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP Transport 配置
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 重试次数（不含首次请求）
    pub max_retries: u32,
    /// 首次重试前的等待时间（毫秒），之后翻倍
    pub retry_delay_ms: u64,
    /// 代理 URL
    pub proxy: Option<String>,
    /// 访问令牌
    pub token: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 1,
            retry_delay_ms: 1000,
            proxy: None,
            token: None,
        }
    }
}

impl HttpTransportConfig {
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.is_empty());
        self
    }
}

/// HTTP Transport
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/html;q=0.9, */*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru,en;q=0.9"));

        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("bearer {}", token))
                .map_err(|e| TransportError::InvalidRequest(format!("Invalid token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(30));

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| TransportError::InvalidRequest(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.retry_delay_ms.saturating_mul(2u64.saturating_pow(attempt)))
    }

    async fn send_once(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(url.to_string())
            } else {
                TransportError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::NetworkError(format!("Failed to read body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }
}

/// 可重试的状态码
fn is_retryable_status(status: u16) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(&status)
}

#[async_trait]
impl TransportPort for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let mut attempt = 0;

        loop {
            tracing::debug!(url = %url, attempt = attempt, "GET");

            let result = self.send_once(url).await;
            let retryable = match &result {
                Ok(response) => is_retryable_status(response.status),
                Err(TransportError::InvalidRequest(_)) => false,
                Err(_) => true,
            };

            if !retryable || attempt >= self.config.max_retries {
                return result;
            }

            let delay = self.retry_delay(attempt);
            tracing::warn!(
                url = %url,
                attempt = attempt + 1,
                max_retries = self.config.max_retries,
                delay_ms = delay.as_millis() as u64,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
