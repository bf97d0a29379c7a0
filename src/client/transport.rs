//! HTTPトランスポート
//!
//! `Backend` トレイトでHTTP呼び出しを抽象化し、本番は reqwest、
//! テストはインメモリ実装を差し込む。

use crate::config::Config;
use crate::error::{CatalogError, Result};
use astro_catalog_common::FormDraft;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// 送信メソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// ステータスと本文だけを持つレスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// パス（`/api/...`）に対してリクエストを送る
    ///
    /// 通信自体の失敗のみ `Err`、HTTPエラーは `RawResponse` で返す。
    async fn request(&self, method: Method, path: &str, body: Option<&FormDraft>) -> Result<RawResponse>;
}

/// reqwest による実装
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_builder(config, Self::client_builder(config))
    }

    fn client_builder(config: &Config) -> reqwest::ClientBuilder {
        reqwest::Client::builder().timeout(config.timeout())
    }

    fn with_builder(config: &Config, builder: reqwest::ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| CatalogError::Config(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            token: config.api_token(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// 下書きを multipart フォームに変換
pub fn build_form(draft: &FormDraft) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in draft.form_fields() {
        form = form.text(name, value);
    }
    for attachment in &draft.attachments {
        let part = Part::bytes(attachment.data.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.content_type)?;
        form = form.part(attachment.field.clone(), part);
    }
    Ok(form)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn request(&self, method: Method, path: &str, body: Option<&FormDraft>) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(draft) = body {
            builder = builder.multipart(build_form(draft)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(%method, %url, status, bytes = body.len(), "received response");

        Ok(RawResponse { status, body })
    }
}
