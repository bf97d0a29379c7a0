//! 一覧の絞り込み・並び替え
//!
//! `view` は取得済みの一覧から表示用の派生ビューを作る純粋関数。
//! 条件はすべて AND で結合し、元の配列は変更しない。

use crate::sort::{sort_items, SortKey};
use crate::types::ListItem;
use regex::Regex;

/// 「すべて」を表す選択値
pub const ALL: &str = "all";

/// 価格帯（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl std::str::FromStr for PriceRange {
    type Err = String;

    /// `all`, `1000-5000`, `5000+`, `-1000` を受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref RANGE: Regex =
                Regex::new(r"^\s*(\d+(?:\.\d+)?)?\s*(-|\+)\s*(\d+(?:\.\d+)?)?\s*$").unwrap();
        }

        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            return Ok(PriceRange::default());
        }

        let caps = RANGE
            .captures(trimmed)
            .ok_or_else(|| format!("Invalid price range: {}. Use all, 1000-5000, 5000+, or -1000", s))?;

        let min = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
        let max = caps.get(3).and_then(|m| m.as_str().parse::<f64>().ok());
        let op = caps.get(2).map(|m| m.as_str()).unwrap_or("-");

        let range = match (op, min, max) {
            ("+", Some(min), None) => PriceRange::new(Some(min), None),
            ("-", min, max) if min.is_some() || max.is_some() => PriceRange::new(min, max),
            _ => return Err(format!("Invalid price range: {}", s)),
        };

        if let (Some(min), Some(max)) = (range.min, range.max) {
            if min > max {
                return Err(format!("Invalid price range: {} (min > max)", s));
            }
        }
        Ok(range)
    }
}

/// 絞り込み・並び替え条件
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    pub category: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub price_range: Option<PriceRange>,
    pub sort: SortKey,
    /// 公開中の項目のみ
    pub active_only: bool,
}

impl Criteria {
    /// ストアフロントの既定条件（公開中のみ・人気順）
    pub fn storefront() -> Self {
        Self {
            active_only: true,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// 全条件を満たすか
    pub fn matches(&self, item: &ListItem) -> bool {
        if self.active_only && !item.is_active() {
            return false;
        }
        if !selection_matches(self.category.as_deref(), item.category.as_deref()) {
            return false;
        }
        if !selection_matches(self.location.as_deref(), item.location.as_deref()) {
            return false;
        }
        if !selection_matches(self.status.as_deref(), item.status.as_deref()) {
            return false;
        }
        if let Some(range) = self.price_range.filter(|r| !r.is_unbounded()) {
            if !range.contains(item.price_or_zero()) {
                return false;
            }
        }
        search_matches(self.search.as_deref(), item)
    }
}

/// 選択値が未指定・「all」なら常に一致、それ以外は大文字小文字を無視して比較
fn selection_matches(selected: Option<&str>, actual: Option<&str>) -> bool {
    let selected = match selected.map(str::trim) {
        None | Some("") => return true,
        Some(s) if s.eq_ignore_ascii_case(ALL) => return true,
        Some(s) => s.to_lowercase(),
    };
    actual
        .map(|a| a.trim().to_lowercase() == selected)
        .unwrap_or(false)
}

/// 検索語がいずれかのテキストフィールドに部分一致するか
fn search_matches(search: Option<&str>, item: &ListItem) -> bool {
    let needle = match search.map(str::trim) {
        None | Some("") => return true,
        Some(s) => s.to_lowercase(),
    };
    item.search_fields()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// 表示用の派生ビューを作成
///
/// 要素は参照のまま返すため、同じ入力なら同じ要素が同じ順序で並ぶ。
pub fn view<'a>(items: &'a [ListItem], criteria: &Criteria) -> Vec<&'a ListItem> {
    let mut filtered: Vec<&ListItem> = items.iter().filter(|item| criteria.matches(item)).collect();
    sort_items(&mut filtered, criteria.sort);
    filtered
}

/// 一覧に現れるカテゴリを出現順・重複なしで収集（フィルタ選択肢用）
pub fn distinct_categories(items: &[ListItem]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter_map(|i| i.category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_lowercase()))
        .map(str::to_string)
        .collect()
}
