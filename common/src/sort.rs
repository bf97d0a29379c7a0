//! 並び替えキーと比較関数

use crate::types::ListItem;
use std::cmp::Ordering;

/// 並び替えキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// 人気順（デフォルト）
    #[default]
    Popularity,
    /// 価格の安い順
    PriceLow,
    /// 価格の高い順
    PriceHigh,
    /// 評価の高い順（未設定は 4.5）
    Rating,
    /// 新着順
    Newest,
}

impl SortKey {
    /// 2項目を比較
    pub fn compare(&self, a: &ListItem, b: &ListItem) -> Ordering {
        match self {
            SortKey::PriceLow => a.price_or_zero().total_cmp(&b.price_or_zero()),
            SortKey::PriceHigh => b.price_or_zero().total_cmp(&a.price_or_zero()),
            SortKey::Rating => b.rating_or_default().total_cmp(&a.rating_or_default()),
            SortKey::Newest => b.created_at().cmp(&a.created_at()),
            SortKey::Popularity => b.popularity_score().total_cmp(&a.popularity_score()),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "popularity" | "popular" => Ok(SortKey::Popularity),
            "price-low" | "price_low" | "price-asc" => Ok(SortKey::PriceLow),
            "price-high" | "price_high" | "price-desc" => Ok(SortKey::PriceHigh),
            "rating" => Ok(SortKey::Rating),
            "newest" | "new" => Ok(SortKey::Newest),
            _ => Err(format!(
                "Unknown sort key: {}. Use popularity, price-low, price-high, rating, or newest",
                s
            )),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Popularity => write!(f, "popularity"),
            SortKey::PriceLow => write!(f, "price-low"),
            SortKey::PriceHigh => write!(f, "price-high"),
            SortKey::Rating => write!(f, "rating"),
            SortKey::Newest => write!(f, "newest"),
        }
    }
}

/// 安定ソートで並び替え（同値は元の順序を保持）
pub fn sort_items(items: &mut [&ListItem], key: SortKey) {
    items.sort_by(|a, b| key.compare(a, b));
}
