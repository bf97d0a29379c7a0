//! テスト用インメモリバックエンド

#![allow(dead_code)]

use astro_catalog::client::{Backend, Method, RawResponse};
use astro_catalog::error::{CatalogError, Result};
use astro_catalog_common::FormDraft;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// 1回分の応答
#[derive(Debug, Clone)]
pub enum Reply {
    Respond { status: u16, body: String, delay_ms: u64 },
    NetworkDown,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Respond {
            status: 200,
            body: body.to_string(),
            delay_ms: 0,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Respond {
            status,
            body: body.to_string(),
            delay_ms: 0,
        }
    }

    pub fn delayed(body: &str, delay_ms: u64) -> Self {
        Reply::Respond {
            status: 200,
            body: body.to_string(),
            delay_ms,
        }
    }
}

/// 送信されたリクエストの記録
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<FormDraft>,
}

/// ルート（"GET /api/..."）ごとに応答キューを持つ。最後の応答は繰り返し使う。
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, path: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(format!("{} {}", method, path))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(&format!("{} {}", method, path))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn request(&self, method: Method, path: &str, body: Option<&FormDraft>) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        match self.next_reply(method, path) {
            Some(Reply::Respond { status, body, delay_ms }) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(RawResponse::new(status, body))
            }
            Some(Reply::NetworkDown) => Err(CatalogError::Network("connection refused".into())),
            None => Ok(RawResponse::new(404, r#"{"success": false, "message": "Not found"}"#)),
        }
    }
}
