//! フォーム下書き（作成・更新リクエストの元データ）と入力検証

use crate::error::{Error, Result};
use crate::types::ResourceKind;
use std::collections::BTreeMap;
use std::path::Path;

/// 送信モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update,
}

/// フォームのプリミティブ値
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// 効能・必要品などのリスト（JSON配列文字列として送信）
    List(Vec<String>),
}

impl FieldValue {
    /// multipart に載せる文字列表現
    pub fn to_form_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::List(items) => {
                serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    /// CLIの `key=value` 入力から推測して生成
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "true" => return FieldValue::Bool(true),
            "false" => return FieldValue::Bool(false),
            _ => {}
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}

/// 添付ファイル（画像・動画・サムネイル）
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// フォームのフィールド名（image, images, video, thumbnail など）
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("pdf", "application/pdf"),
];

/// 拡張子からContent-Typeを推定
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    CONTENT_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, ct)| *ct)
        .unwrap_or("application/octet-stream")
}

impl Attachment {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            field: field.into(),
            file_name,
            content_type,
            data,
        }
    }

    /// ファイルから読み込み
    pub fn from_path(field: &str, path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(field, file_name, data))
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_media(&self) -> bool {
        self.is_image() || self.content_type.starts_with("video/")
    }
}

/// フォーム下書き
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub fields: BTreeMap<String, FieldValue>,
    pub attachments: Vec<Attachment>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Text(value.into()));
        self
    }

    pub fn number(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Number(value));
        self
    }

    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Bool(value));
        self
    }

    pub fn list(mut self, name: &str, values: Vec<String>) -> Self {
        self.fields.insert(name.to_string(), FieldValue::List(values));
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    /// 値が入っているか（空白のみは未入力扱い）
    pub fn has(&self, name: &str) -> bool {
        self.fields.get(name).map(|v| !v.is_blank()).unwrap_or(false)
    }

    /// multipart のテキスト部分（フィールド名, 文字列値）
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_form_string()))
            .collect()
    }

    /// 送信前の必須項目チェック
    ///
    /// 最初に見つかった不足項目をエラーとして返す。
    pub fn validate(&self, kind: ResourceKind, mode: SubmitMode) -> Result<()> {
        for field in required_fields(kind) {
            if !self.has(field) {
                return Err(Error::validation(field, format!("{} is required", field)));
            }
        }

        if mode == SubmitMode::Create {
            if kind.is_product() {
                if !self.attachments.iter().any(Attachment::is_image) {
                    return Err(Error::validation("image", "At least one image is required"));
                }
            } else if kind == ResourceKind::Gallery && !self.attachments.iter().any(Attachment::is_media) {
                return Err(Error::validation("media", "An image or video file is required"));
            }
        }

        if let Some(FieldValue::Number(price)) = self.fields.get("price") {
            if *price < 0.0 {
                return Err(Error::validation("price", "price must not be negative"));
            }
        }

        Ok(())
    }
}

/// 種別ごとの必須フィールド
pub fn required_fields(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Blog => &["title", "excerpt", "content", "category"],
        ResourceKind::Gallery => &["title"],
        ResourceKind::Puja | ResourceKind::Rudraksha | ResourceKind::Gemstone => &["name"],
    }
}
