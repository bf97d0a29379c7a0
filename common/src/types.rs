//! カタログ項目の型定義
//!
//! バックエンドから届くレコード（プージャ・ルドラクシャ・宝石・ブログ・ギャラリー）は
//! 形が揃っていないため、すべて `ListItem` に寛容にデコードする。
//! - 数値は文字列で届いてもよい
//! - タグはカンマ区切り文字列でもよい
//! - null は未設定として扱う

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 評価が未設定の項目に使う既定値
pub const DEFAULT_RATING: f64 = 4.5;

/// リソース種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Puja,
    Rudraksha,
    Gemstone,
    Blog,
    Gallery,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Puja,
        ResourceKind::Rudraksha,
        ResourceKind::Gemstone,
        ResourceKind::Blog,
        ResourceKind::Gallery,
    ];

    /// 設定ファイル・CLIで使う名前
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Puja => "puja",
            ResourceKind::Rudraksha => "rudraksha",
            ResourceKind::Gemstone => "gemstone",
            ResourceKind::Blog => "blog",
            ResourceKind::Gallery => "gallery",
        }
    }

    /// 画像添付が必須の商品系リソースか
    pub fn is_product(&self) -> bool {
        matches!(
            self,
            ResourceKind::Puja | ResourceKind::Rudraksha | ResourceKind::Gemstone
        )
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "puja" | "pujas" => Ok(ResourceKind::Puja),
            "rudraksha" => Ok(ResourceKind::Rudraksha),
            "gemstone" | "gemstones" | "gem" => Ok(ResourceKind::Gemstone),
            "blog" | "blogs" => Ok(ResourceKind::Blog),
            "gallery" | "media" => Ok(ResourceKind::Gallery),
            _ => {
                let names: Vec<&str> = ResourceKind::ALL.iter().map(ResourceKind::as_str).collect();
                Err(format!("Unknown resource: {}. Use one of: {}", s, names.join(", ")))
            }
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一覧に表示できる項目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[serde(rename = "_id", default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// ブログ・ギャラリーは name ではなく title を持つ
    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub deity: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "de_string_list", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// レビュー（件数・配列のどちらでも届いたまま保持）
    #[serde(default, deserialize_with = "de_opt_value", skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Value>,

    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub review_count: Option<f64>,

    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,

    #[serde(default, deserialize_with = "de_opt_bool", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "de_opt_string", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "de_value_list", skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<Value>,

    #[serde(default, deserialize_with = "de_value_list", skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Value>,

    #[serde(default, deserialize_with = "de_value_list", skip_serializing_if = "Vec::is_empty")]
    pub worship_options: Vec<Value>,

    /// 上記以外のフィールド（そのまま保持）
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ListItem {
    /// `_id` を優先し、なければ `id`
    pub fn id(&self) -> Option<&str> {
        self.mongo_id
            .as_deref()
            .or(self.id.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// 表示名（name → title の順）
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }

    /// 公開中か
    ///
    /// `isActive` があればそれに従い、なければ `status` が
    /// active / published のときのみ公開扱い。どちらもなければ非公開。
    pub fn is_active(&self) -> bool {
        if let Some(active) = self.is_active {
            return active;
        }
        match self.status.as_deref() {
            Some(status) => {
                let status = status.trim().to_lowercase();
                status == "active" || status == "published"
            }
            None => false,
        }
    }

    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    pub fn rating_or_default(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }

    /// レビュー件数（配列なら要素数、なければ reviewCount）
    pub fn review_total(&self) -> Option<f64> {
        let from_reviews = match &self.reviews {
            Some(Value::Array(items)) => Some(items.len() as f64),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        };
        from_reviews.or(self.review_count)
    }

    /// 人気度（popularity → レビュー件数）
    pub fn popularity_score(&self) -> f64 {
        self.popularity.or_else(|| self.review_total()).unwrap_or(0.0)
    }

    /// 作成日時（RFC 3339 として解釈できない場合は None）
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
    }

    /// 検索対象のテキストフィールド
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_deref(),
            self.title.as_deref(),
            self.english_name.as_deref(),
            self.description.as_deref(),
            self.deity.as_deref(),
            self.category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .chain(self.tags.iter().map(String::as_str))
    }
}

// =============================================
// 寛容なデシリアライザ
// =============================================

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn de_opt_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()))
}

fn de_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0),
        _ => None,
    })
}

fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn de_value_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    })
}
