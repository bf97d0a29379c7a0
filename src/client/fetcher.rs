//! エンドポイント候補を順に試して一覧を取得する
//!
//! 1. 候補を優先順に GET
//! 2. 通信失敗・2xx以外は次の候補へ
//! 3. 2xx でも形式が不明なら記録して次の候補へ
//! 4. 全滅時は不明形式があれば `UnexpectedFormat`、なければ `AllEndpointsFailed`

use super::transport::{Backend, Method, RawResponse};
use crate::error::{CatalogError, Result};
use astro_catalog_common::{error_message, normalize_items, normalize_lookup, ListItem};
use serde_json::Value;
use tracing::{debug, warn};

/// 一覧を取得
pub async fn fetch_first_ok<B: Backend + ?Sized>(backend: &B, candidates: &[String]) -> Result<Vec<ListItem>> {
    fetch_with(backend, candidates, normalize_items).await
}

/// 参照リストを取得
pub async fn fetch_lookup<B: Backend + ?Sized>(backend: &B, path: &str) -> Result<Vec<String>> {
    fetch_with(backend, &[path.to_string()], normalize_lookup).await
}

async fn fetch_with<B, T, F>(backend: &B, candidates: &[String], normalize: F) -> Result<Vec<T>>
where
    B: Backend + ?Sized,
    F: Fn(&str) -> astro_catalog_common::Result<Vec<T>>,
{
    if candidates.is_empty() {
        return Err(CatalogError::Config("エンドポイントが設定されていません".into()));
    }

    let mut attempts = Vec::new();
    let mut saw_unexpected_format = false;

    for path in candidates {
        debug!(%path, "trying endpoint");

        let response = match backend.request(Method::Get, path, None).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%path, error = %e, "endpoint unreachable, trying next");
                attempts.push(format!("{}: {}", path, e));
                continue;
            }
        };

        if !response.is_success() {
            warn!(%path, status = response.status, "endpoint returned error status, trying next");
            attempts.push(format!("{}: HTTP {}", path, response.status));
            continue;
        }

        match normalize(&response.body) {
            Ok(items) => {
                debug!(%path, count = items.len(), "endpoint ok");
                return Ok(items);
            }
            Err(astro_catalog_common::Error::Rejected(message)) => {
                warn!(%path, %message, "endpoint rejected request, trying next");
                attempts.push(format!("{}: {}", path, message));
            }
            Err(e) => {
                warn!(%path, error = %e, "unexpected response format, trying next");
                saw_unexpected_format = true;
                attempts.push(format!("{}: {}", path, e));
            }
        }
    }

    if saw_unexpected_format {
        Err(CatalogError::UnexpectedFormat)
    } else {
        Err(CatalogError::AllEndpointsFailed { attempts })
    }
}

/// 失敗レスポンスをエラーに変換（本文の message / error を優先）
pub fn status_error(response: &RawResponse) -> CatalogError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| format!("Request failed with status {}", response.status));

    CatalogError::Status {
        status: response.status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_body_message() {
        let response = RawResponse::new(400, r#"{"success": false, "message": "Name already exists"}"#);
        match status_error(&response) {
            CatalogError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Name already exists");
            }
            other => panic!("Expected Status, got {:?}", other),
        }
    }

    #[test]
    fn test_status_error_generic() {
        let response = RawResponse::new(502, "<html>Bad Gateway</html>");
        let err = status_error(&response);
        assert_eq!(err.to_string(), "HTTP 502: Request failed with status 502");
    }
}
