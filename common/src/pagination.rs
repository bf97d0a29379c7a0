//! ページ分割

/// 1ページあたりの既定件数
pub const DEFAULT_PER_PAGE: usize = 12;

/// 1ページ分の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1始まりのページ番号（範囲外は丸め済み）
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// 派生ビューをページに分割
///
/// - `per_page == 0` は既定件数
/// - ページ番号は `[1, total_pages]` に丸める
/// - 空でも `total_pages` は 1
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let total = items.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    let slice: &[T] = if start < total { &items[start..end] } else { &[] };

    Page {
        items: slice.to_vec(),
        page,
        per_page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_basic() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(&items, 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_prev());

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_clamps() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(&items, 0, 2).page, 1);
        assert_eq!(paginate(&items, 99, 2).page, 3);
        assert_eq!(paginate(&items, 99, 2).items, vec![5]);
    }

    #[test]
    fn test_paginate_empty_and_default_size() {
        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 1, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert!(page.items.is_empty());
    }
}
