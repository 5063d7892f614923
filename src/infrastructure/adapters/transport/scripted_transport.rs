//! Scripted Transport - 用于测试的 Transport
//!
//! 按 URL 返回预设响应，不发起真实请求；记录每次调用及其时间点。
//! 同一 URL 预设多条响应时按顺序消费，最后一条会被重复返回。

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

use crate::application::ports::{TransportError, TransportPort, TransportResponse};

/// 预设回复
#[derive(Debug, Clone)]
enum ScriptedReply {
    Response(TransportResponse),
    Failure(String),
}

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub at: Instant,
}

/// Scripted Transport
///
/// 未预设的 URL 返回 404
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<ScriptedReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: &str, reply: ScriptedReply) {
        lock(&self.routes)
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    /// 预设文本响应
    pub fn respond(&self, url: &str, status: u16, body: impl Into<String>) -> &Self {
        self.push(url, ScriptedReply::Response(TransportResponse::new(status, body)));
        self
    }

    /// 预设 JSON 响应
    pub fn respond_json(&self, url: &str, status: u16, body: &serde_json::Value) -> &Self {
        self.respond(url, status, body.to_string())
    }

    /// 预设传输失败
    pub fn fail(&self, url: &str, message: impl Into<String>) -> &Self {
        self.push(url, ScriptedReply::Failure(message.into()));
        self
    }

    /// 所有调用记录（按时间顺序）
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// 指定 URL 被调用的次数
    pub fn calls_to(&self, url: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.url == url).count()
    }
}

#[async_trait]
impl TransportPort for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        lock(&self.calls).push(RecordedCall {
            url: url.to_string(),
            at: Instant::now(),
        });

        let reply = {
            let mut routes = lock(&self.routes);
            match routes.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        tracing::debug!(url = %url, "ScriptedTransport: serving scripted reply");

        match reply {
            Some(ScriptedReply::Response(response)) => Ok(response),
            Some(ScriptedReply::Failure(message)) => Err(TransportError::NetworkError(message)),
            None => Ok(TransportResponse::new(404, "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_repeats_last() {
        let transport = ScriptedTransport::new();
        transport.respond("u", 500, "").respond("u", 200, "ok");

        assert_eq!(transport.get("u").await.unwrap().status, 500);
        assert_eq!(transport.get("u").await.unwrap().status, 200);
        assert_eq!(transport.get("u").await.unwrap().status, 200);
        assert_eq!(transport.calls_to("u"), 3);
    }

    #[tokio::test]
    async fn test_unknown_url_is_404_and_failures_propagate() {
        let transport = ScriptedTransport::new();
        transport.fail("down", "connection refused");

        assert_eq!(transport.get("missing").await.unwrap().status, 404);
        assert!(transport.get("down").await.is_err());
        assert_eq!(transport.call_count(), 2);
    }
}
