//! 一覧の端末表示

use astro_catalog_common::{ListItem, Page};

/// 価格表示（₹、整数なら小数なし）
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.fract() == 0.0 => format!("₹{}", p as i64),
        Some(p) => format!("₹{:.2}", p),
        None => "-".to_string(),
    }
}

/// 1項目を1行で表示
pub fn format_item_line(item: &ListItem) -> String {
    let status = if item.is_active() { "●" } else { "○" };
    let rating = item
        .rating
        .map(|r| format!("★{:.1}", r))
        .unwrap_or_else(|| "★-".to_string());

    format!(
        "{} {:<28} {:<16} {:>10} {:>5}  {}",
        status,
        truncate(item.display_name(), 28),
        truncate(item.category.as_deref().unwrap_or("-"), 16),
        format_price(item.price),
        rating,
        item.id().unwrap_or("-"),
    )
}

/// ページ全体を表示用の行に変換
pub fn format_page(page: &Page<ListItem>) -> Vec<String> {
    let mut lines: Vec<String> = page.items.iter().map(format_item_line).collect();
    lines.push(format!(
        "--- {}件中 {}ページ目 / 全{}ページ",
        page.total, page.page, page.total_pages
    ));
    if page.has_next() {
        lines.push(format!("次のページ: --page {}", page.page + 1));
    }
    lines
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
