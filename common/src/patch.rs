//! 楽観的な一覧更新
//!
//! サーバーで確定した変更を、再取得せずにローカルの一覧へ反映する。
//! - 作成: 先頭に追加（同じIDが既にあれば置き換える）
//! - 更新: 同じIDの項目を置換
//! - 削除: 同じIDの項目を除去

use crate::types::ListItem;

/// サーバーで成功した変更
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Created(ListItem),
    Updated(ListItem),
    Deleted(String),
}

/// 変更を一覧に反映し、一覧が変化したかを返す
pub fn apply(items: &mut Vec<ListItem>, mutation: Mutation) -> bool {
    match mutation {
        Mutation::Created(item) => {
            if let Some(id) = item.id().map(str::to_string) {
                items.retain(|i| i.id() != Some(id.as_str()));
            }
            items.insert(0, item);
            true
        }
        Mutation::Updated(item) => {
            let Some(id) = item.id().map(str::to_string) else {
                return false;
            };
            match items.iter().position(|i| i.id() == Some(id.as_str())) {
                Some(pos) => {
                    items[pos] = item;
                    true
                }
                None => false,
            }
        }
        Mutation::Deleted(id) => {
            let before = items.len();
            items.retain(|i| i.id() != Some(id.as_str()));
            items.len() != before
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> ListItem {
        ListItem {
            mongo_id: Some(id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_prepends() {
        let mut items = vec![item("1", "Ruby"), item("2", "Emerald")];
        assert!(apply(&mut items, Mutation::Created(item("3", "Pearl"))));
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id(), Some("3"));
    }

    #[test]
    fn test_create_replaces_existing_id() {
        // 作成中に再取得が反映済みの場合
        let mut items = vec![item("1", "Ruby"), item("3", "Pearl (old)"), item("2", "Emerald")];
        assert!(apply(&mut items, Mutation::Created(item("3", "Pearl"))));

        let ids: Vec<_> = items.iter().filter_map(ListItem::id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(items[0].display_name(), "Pearl");

        assert!(apply(&mut items, Mutation::Updated(item("3", "Moti"))));
        assert_eq!(items.iter().filter(|i| i.id() == Some("3")).count(), 1);
        assert_eq!(items[0].display_name(), "Moti");
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut items = vec![item("1", "Ruby"), item("2", "Emerald")];
        assert!(apply(&mut items, Mutation::Updated(item("2", "Panna"))));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].display_name(), "Panna");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut items = vec![item("1", "Ruby")];
        let before = items.clone();
        assert!(!apply(&mut items, Mutation::Updated(item("9", "Ghost"))));
        assert_eq!(items, before);
    }

    #[test]
    fn test_delete_removes_by_id() {
        let mut items = vec![item("1", "Ruby"), item("2", "Emerald")];
        assert!(apply(&mut items, Mutation::Deleted("1".into())));
        assert!(items.iter().all(|i| i.id() != Some("1")));
        assert!(!apply(&mut items, Mutation::Deleted("1".into())));
    }
}
