//! APIレスポンスのエンベロープ正規化
//!
//! バックエンドは同じ一覧をいくつかの形で返す:
//! 1. `{ "success": true, "data": [...] }`（data が `{ "blogs": [...] }` の場合もある）
//! 2. `{ "pujas": [...] }` などリソース名のキー
//! 3. 生の `[...]` 配列
//!
//! パース直後に `Envelope` へ落とし込み、以降は `Vec<ListItem>` だけを扱う。

use crate::error::{Error, Result};
use crate::types::ListItem;
use serde::Deserialize;
use serde_json::Value;

/// 一覧レスポンスの既知の形
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Bare(Vec<ListItem>),
    Wrapped {
        success: Option<bool>,
        data: Payload,
        message: Option<String>,
    },
    Keyed(Keyed),
    Status {
        success: bool,
        message: Option<String>,
        error: Option<String>,
    },
}

/// `data` の中身
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Items(Vec<ListItem>),
    Keyed(Keyed),
}

/// リソース名をキーにした一覧
#[derive(Debug, Deserialize)]
pub struct Keyed {
    success: Option<bool>,
    message: Option<String>,
    #[serde(
        alias = "pujas",
        alias = "rudraksha",
        alias = "gemstones",
        alias = "blogs",
        alias = "media",
        alias = "gallery"
    )]
    items: Vec<ListItem>,
}

impl Envelope {
    /// 項目配列を取り出す
    pub fn into_items(self) -> Result<Vec<ListItem>> {
        match self {
            Envelope::Bare(items) => Ok(items),
            Envelope::Wrapped {
                success: Some(false),
                message,
                ..
            } => Err(rejected(message)),
            Envelope::Wrapped { data, .. } => match data {
                Payload::Items(items) => Ok(items),
                Payload::Keyed(keyed) => keyed.into_items(),
            },
            Envelope::Keyed(keyed) => keyed.into_items(),
            Envelope::Status {
                success: false,
                message,
                error,
            } => Err(rejected(message.or(error))),
            Envelope::Status { success: true, .. } => Err(Error::UnexpectedFormat),
        }
    }
}

impl Keyed {
    fn into_items(self) -> Result<Vec<ListItem>> {
        if self.success == Some(false) {
            return Err(rejected(self.message));
        }
        Ok(self.items)
    }
}

fn rejected(message: Option<String>) -> Error {
    Error::Rejected(message.unwrap_or_else(|| "Request was not successful".to_string()))
}

/// 一覧レスポンス本文を正規化
///
/// # Examples
/// ```
/// use astro_catalog_common::normalize_items;
///
/// let items = normalize_items(r#"{"success": true, "data": [{"name": "Ganesh Puja"}]}"#).unwrap();
/// assert_eq!(items[0].display_name(), "Ganesh Puja");
/// ```
pub fn normalize_items(body: &str) -> Result<Vec<ListItem>> {
    let value: Value = serde_json::from_str(body)?;
    let envelope: Envelope = serde_json::from_value(value).map_err(|_| Error::UnexpectedFormat)?;
    envelope.into_items()
}

/// 単一項目を包むキー（作成・更新レスポンス）
const ITEM_KEYS: &[&str] = &[
    "item", "puja", "rudraksha", "gemstone", "blog", "media", "gallery",
];

/// 作成・更新レスポンスから項目を1件取り出す
///
/// `{success, data: {...}}`、`{rudraksha: {...}}`、IDを持つ生のオブジェクトに対応。
pub fn normalize_item(body: &str) -> Result<ListItem> {
    let value: Value = serde_json::from_str(body)?;
    check_status(&value)?;

    let found = locate_item(&value, 0).ok_or(Error::UnexpectedFormat)?;
    let item: ListItem = serde_json::from_value(found.clone()).map_err(|_| Error::UnexpectedFormat)?;
    if item.id().is_none() {
        return Err(Error::UnexpectedFormat);
    }
    Ok(item)
}

/// 本文がない、または項目を返さない操作（削除など）の成否確認
pub fn check_status_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    let value: Value = serde_json::from_str(body)?;
    check_status(&value)
}

fn check_status(value: &Value) -> Result<()> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(rejected(error_message(value)));
    }
    Ok(())
}

fn locate_item(value: &Value, depth: usize) -> Option<&Value> {
    let object = value.as_object()?;
    if depth > 2 {
        return None;
    }
    if let Some(data) = object.get("data") {
        if let Some(found) = locate_item(data, depth + 1) {
            return Some(found);
        }
    }
    for key in ITEM_KEYS {
        if let Some(inner) = object.get(*key).filter(|v| v.is_object()) {
            return Some(inner);
        }
    }
    if object.contains_key("_id") || object.contains_key("id") {
        return Some(value);
    }
    None
}

/// エラーレスポンス本文からメッセージを取り出す（`message` → `error`）
pub fn error_message(value: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| match value.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

// =============================================
// 参照リスト（カテゴリ・神格・惑星）
// =============================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LookupEnvelope {
    Bare(Vec<LookupEntry>),
    Wrapped {
        success: Option<bool>,
        data: Vec<LookupEntry>,
        message: Option<String>,
    },
    Keyed {
        #[serde(alias = "categories", alias = "deities", alias = "planets")]
        items: Vec<LookupEntry>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LookupEntry {
    Plain(String),
    Named {
        name: Option<String>,
        title: Option<String>,
        value: Option<String>,
    },
}

impl LookupEntry {
    fn into_label(self) -> Option<String> {
        match self {
            LookupEntry::Plain(s) => Some(s),
            LookupEntry::Named { name, title, value } => name.or(title).or(value),
        }
    }
}

/// 参照リストのレスポンスを文字列リストに正規化
pub fn normalize_lookup(body: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(body)?;
    check_status(&value)?;
    let envelope: LookupEnvelope =
        serde_json::from_value(value).map_err(|_| Error::UnexpectedFormat)?;

    let entries = match envelope {
        LookupEnvelope::Bare(entries) => entries,
        LookupEnvelope::Wrapped {
            success: Some(false),
            message,
            ..
        } => return Err(rejected(message)),
        LookupEnvelope::Wrapped { data, .. } => data,
        LookupEnvelope::Keyed { items } => items,
    };

    Ok(entries
        .into_iter()
        .filter_map(LookupEntry::into_label)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[ListItem]) -> Vec<&str> {
        items.iter().map(|i| i.display_name()).collect()
    }

    #[test]
    fn test_all_list_shapes_give_same_items() {
        let wrapped = r#"{"success": true, "data": [{"_id": "1", "name": "Ganesh Puja"}, {"_id": "2", "name": "Navgraha Shanti"}]}"#;
        let keyed = r#"{"pujas": [{"_id": "1", "name": "Ganesh Puja"}, {"_id": "2", "name": "Navgraha Shanti"}]}"#;
        let bare = r#"[{"_id": "1", "name": "Ganesh Puja"}, {"_id": "2", "name": "Navgraha Shanti"}]"#;

        let a = normalize_items(wrapped).unwrap();
        let b = normalize_items(keyed).unwrap();
        let c = normalize_items(bare).unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(names(&a), vec!["Ganesh Puja", "Navgraha Shanti"]);
    }

    #[test]
    fn test_nested_data_key() {
        let body = r#"{"success": true, "data": {"blogs": [{"_id": "b1", "title": "Shravan Month"}], "total": 1}}"#;
        let items = normalize_items(body).unwrap();
        assert_eq!(names(&items), vec!["Shravan Month"]);
    }

    #[test]
    fn test_keyed_variants() {
        for key in ["rudraksha", "gemstones", "blogs", "media", "items"] {
            let body = format!(r#"{{"success": true, "{}": [{{"_id": "x"}}]}}"#, key);
            let items = normalize_items(&body).unwrap();
            assert_eq!(items.len(), 1, "key {}", key);
        }
    }

    #[test]
    fn test_empty_list() {
        assert!(normalize_items("[]").unwrap().is_empty());
        assert!(normalize_items(r#"{"success": true, "data": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_unsuccessful_response() {
        let body = r#"{"success": false, "message": "Not authorized"}"#;
        match normalize_items(body) {
            Err(Error::Rejected(msg)) => assert_eq!(msg, "Not authorized"),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_shape() {
        assert!(matches!(
            normalize_items(r#"{"foo": 1}"#),
            Err(Error::UnexpectedFormat)
        ));
        assert!(matches!(
            normalize_items(r#"{"success": true}"#),
            Err(Error::UnexpectedFormat)
        ));
        assert!(matches!(normalize_items("42"), Err(Error::UnexpectedFormat)));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(normalize_items("<html>"), Err(Error::Json(_))));
    }

    #[test]
    fn test_normalize_item_shapes() {
        let wrapped = r#"{"success": true, "data": {"_id": "r1", "name": "Ek Mukhi"}}"#;
        let keyed = r#"{"success": true, "rudraksha": {"_id": "r1", "name": "Ek Mukhi"}}"#;
        let bare = r#"{"_id": "r1", "name": "Ek Mukhi"}"#;

        for body in [wrapped, keyed, bare] {
            let item = normalize_item(body).unwrap();
            assert_eq!(item.id(), Some("r1"));
            assert_eq!(item.display_name(), "Ek Mukhi");
        }
    }

    #[test]
    fn test_normalize_item_without_id() {
        let body = r#"{"success": true, "message": "Created"}"#;
        assert!(matches!(normalize_item(body), Err(Error::UnexpectedFormat)));
    }

    #[test]
    fn test_error_message() {
        let value: Value = serde_json::from_str(r#"{"error": "Invalid price"}"#).unwrap();
        assert_eq!(error_message(&value), Some("Invalid price".to_string()));

        let value: Value = serde_json::from_str(r#"{"error": {"message": "Duplicate"}}"#).unwrap();
        assert_eq!(error_message(&value), Some("Duplicate".to_string()));

        let value: Value = serde_json::from_str(r#"{"message": ""}"#).unwrap();
        assert_eq!(error_message(&value), None);
    }

    #[test]
    fn test_normalize_lookup() {
        let plain = r#"["Nepali", "Indonesian"]"#;
        let wrapped = r#"{"success": true, "data": [{"name": "Nepali"}, {"title": "Indonesian"}]}"#;
        let keyed = r#"{"categories": ["Nepali", " Indonesian ", ""]}"#;

        for body in [plain, wrapped, keyed] {
            assert_eq!(normalize_lookup(body).unwrap(), vec!["Nepali", "Indonesian"]);
        }
    }

    #[test]
    fn test_check_status_body() {
        assert!(check_status_body("").is_ok());
        assert!(check_status_body(r#"{"success": true}"#).is_ok());
        assert!(check_status_body(r#"{"success": false, "message": "gone"}"#).is_err());
    }
}
