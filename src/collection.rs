//! リモートコレクション
//!
//! 1リソース分の `loading / submitting / error / items` を保持し、
//! 取得・絞り込み・作成・更新・削除をまとめて扱う。
//!
//! ## 並行性
//! - `refresh` は世代番号を発行し、最後に開始した取得の結果だけを反映する
//! - 送信中に別の送信が来たら `Busy` を返し、通信しない
//! - 失敗時はローカルの一覧を変更しない

use crate::client::{fetch_first_ok, fetch_lookup, status_error, Backend, Endpoints, HttpBackend, LookupKind, Method};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use astro_catalog_common::{
    check_status_body, normalize_item, paginate, patch, view, Criteria, FormDraft, ListItem, Mutation,
    Page, ResourceKind, SubmitMode,
};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// 画面に相当する状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub items: Vec<ListItem>,
}

/// 取得結果の反映状況
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// 反映した（件数）
    Applied(usize),
    /// より新しい取得が開始されていたため破棄した
    Stale,
}

struct Inner {
    state: CollectionState,
    generation: u64,
}

pub struct RemoteCollection<B> {
    backend: B,
    kind: ResourceKind,
    endpoints: Endpoints,
    inner: Mutex<Inner>,
}

impl RemoteCollection<HttpBackend> {
    /// 設定からHTTPクライアント付きで生成
    pub fn from_config(kind: ResourceKind, config: &Config) -> Result<Self> {
        let backend = HttpBackend::new(config)?;
        Ok(Self::new(backend, kind, Endpoints::resolve(kind, config)))
    }
}

impl<B: Backend> RemoteCollection<B> {
    pub fn new(backend: B, kind: ResourceKind, endpoints: Endpoints) -> Self {
        Self {
            backend,
            kind,
            endpoints,
            inner: Mutex::new(Inner {
                state: CollectionState::default(),
                generation: 0,
            }),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 現在の状態のコピー
    pub fn snapshot(&self) -> CollectionState {
        self.lock().state.clone()
    }

    /// 絞り込み・並び替え済みの一覧
    pub fn view(&self, criteria: &Criteria) -> Vec<ListItem> {
        let inner = self.lock();
        view(&inner.state.items, criteria).into_iter().cloned().collect()
    }

    /// 絞り込み後の1ページ分
    pub fn page(&self, criteria: &Criteria, page: usize, per_page: usize) -> Page<ListItem> {
        paginate(&self.view(criteria), page, per_page)
    }

    /// 一覧を取得し直す
    pub async fn refresh(&self) -> Result<Refresh> {
        let ticket = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.generation
        };
        debug!(kind = %self.kind, ticket, "refresh started");
        let _loading = LoadingGuard { collection: self, ticket };

        let result = fetch_first_ok(&self.backend, &self.endpoints.list).await;

        let mut inner = self.lock();
        if inner.generation != ticket {
            debug!(kind = %self.kind, ticket, current = inner.generation, "dropping stale refresh");
            return Ok(Refresh::Stale);
        }

        inner.state.loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                inner.state.items = items;
                info!(kind = %self.kind, count, "collection loaded");
                Ok(Refresh::Applied(count))
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "collection load failed");
                inner.state.items.clear();
                inner.state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 新規作成（成功時は先頭に追加）
    pub async fn create(&self, draft: &FormDraft) -> Result<ListItem> {
        self.check(draft.validate(self.kind, SubmitMode::Create))?;
        let path = self.endpoints.create.clone();
        let backend = &self.backend;

        self.submit(async move {
            let response = backend.request(Method::Post, &path, Some(draft)).await?;
            if !response.is_success() {
                return Err(status_error(&response));
            }
            let item = normalize_item(&response.body)?;
            Ok((Mutation::Created(item.clone()), item))
        })
        .await
    }

    /// 更新（成功時は同じIDの項目を置換）
    pub async fn update(&self, id: &str, draft: &FormDraft) -> Result<ListItem> {
        self.check(require_id(id))?;
        self.check(draft.validate(self.kind, SubmitMode::Update))?;
        let path = self.endpoints.item(id);
        let backend = &self.backend;

        self.submit(async move {
            let response = backend.request(Method::Put, &path, Some(draft)).await?;
            if !response.is_success() {
                return Err(status_error(&response));
            }
            let item = normalize_item(&response.body)?;
            Ok((Mutation::Updated(item.clone()), item))
        })
        .await
    }

    /// 削除（成功時は一覧から除去）
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.check(require_id(id))?;
        let path = self.endpoints.item(id);
        let id = id.trim().to_string();
        let backend = &self.backend;

        self.submit(async move {
            let response = backend.request(Method::Delete, &path, None).await?;
            if !response.is_success() {
                return Err(status_error(&response));
            }
            check_status_body(&response.body)?;
            Ok((Mutation::Deleted(id), ()))
        })
        .await
    }

    /// 参照リスト（カテゴリ・神格・惑星）を取得
    pub async fn lookup(&self, kind: LookupKind) -> Result<Vec<String>> {
        fetch_lookup(&self.backend, kind.path()).await
    }

    /// 送信前検証の失敗を状態に記録
    fn check(&self, result: astro_catalog_common::Result<()>) -> Result<()> {
        result.map_err(|e| {
            let err = CatalogError::from(e);
            self.lock().state.error = Some(err.to_string());
            err
        })
    }

    /// `send` は送信中フラグを立てた後に初めて実行される
    async fn submit<T, Fut>(&self, send: Fut) -> Result<T>
    where
        Fut: std::future::Future<Output = Result<(Mutation, T)>>,
    {
        let _guard = SubmitGuard::acquire(self)?;

        match send.await {
            Ok((mutation, value)) => {
                let mut inner = self.lock();
                let changed = patch::apply(&mut inner.state.items, mutation);
                inner.state.error = None;
                debug!(kind = %self.kind, changed, "applied mutation");
                Ok(value)
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "submission failed");
                self.lock().state.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// 送信中フラグ（ドロップ時に必ず解除）
struct SubmitGuard<'a, B: Backend> {
    collection: &'a RemoteCollection<B>,
}

impl<'a, B: Backend> SubmitGuard<'a, B> {
    fn acquire(collection: &'a RemoteCollection<B>) -> Result<Self> {
        let mut inner = collection.lock();
        if inner.state.submitting {
            return Err(CatalogError::Busy);
        }
        inner.state.submitting = true;
        Ok(Self { collection })
    }
}

impl<B: Backend> Drop for SubmitGuard<'_, B> {
    fn drop(&mut self) {
        self.collection.lock().state.submitting = false;
    }
}

/// 取得中フラグ（途中で破棄されても、最新の取得なら解除）
struct LoadingGuard<'a, B: Backend> {
    collection: &'a RemoteCollection<B>,
    ticket: u64,
}

impl<B: Backend> Drop for LoadingGuard<'_, B> {
    fn drop(&mut self) {
        let mut inner = self.collection.lock();
        if inner.generation == self.ticket {
            inner.state.loading = false;
        }
    }
}

/// IDはパスの1セグメントとして埋め込むため、区切り文字を含むものは拒否
fn require_id(id: &str) -> astro_catalog_common::Result<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(astro_catalog_common::Error::validation("id", "id is required"));
    }
    let separator = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace();
    if id == "." || id == ".." || id.chars().any(separator) {
        return Err(astro_catalog_common::Error::validation("id", format!("invalid id: {}", id)));
    }
    Ok(())
}
