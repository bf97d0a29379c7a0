//! リソースごとのエンドポイント定義

use crate::config::Config;
use astro_catalog_common::ResourceKind;

/// 1リソース分のエンドポイント
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    /// 一覧取得の候補（優先順）
    pub list: Vec<String>,
    pub create: String,
    /// `:id` を付ける前のパス
    pub item_base: String,
}

impl Endpoints {
    /// 組み込みの既定テーブル
    pub fn defaults(kind: ResourceKind) -> Self {
        let (list, base): (Vec<&str>, &str) = match kind {
            ResourceKind::Puja => (
                vec!["/api/puja/public", "/api/puja/all", "/api/puja/admin/all"],
                "/api/puja",
            ),
            ResourceKind::Rudraksha => (
                vec!["/api/rudraksha/public", "/api/rudraksha/admin/all"],
                "/api/rudraksha",
            ),
            ResourceKind::Gemstone => (
                vec!["/api/gemstones/public", "/api/gemstones/admin/all"],
                "/api/gemstones",
            ),
            ResourceKind::Blog => (vec!["/api/blogs"], "/api/blogs"),
            ResourceKind::Gallery => (vec!["/api/gallery/"], "/api/gallery"),
        };

        Self {
            list: list.iter().map(|s| s.to_string()).collect(),
            create: format!("{}/create", base),
            item_base: base.to_string(),
        }
    }

    /// 設定ファイルの上書きを反映
    pub fn resolve(kind: ResourceKind, config: &Config) -> Self {
        let mut endpoints = Self::defaults(kind);
        if let Some(paths) = config.endpoint_override(kind) {
            endpoints.list = paths.to_vec();
        }
        endpoints
    }

    pub fn item(&self, id: &str) -> String {
        format!("{}/{}", self.item_base, id.trim())
    }
}

/// ルドラクシャの参照リスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Categories,
    Deities,
    Planets,
}

impl LookupKind {
    pub fn path(&self) -> &'static str {
        match self {
            LookupKind::Categories => "/api/rudraksha/categories/list",
            LookupKind::Deities => "/api/rudraksha/deities/list",
            LookupKind::Planets => "/api/rudraksha/planets/list",
        }
    }
}

impl std::str::FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "categories" | "category" => Ok(LookupKind::Categories),
            "deities" | "deity" => Ok(LookupKind::Deities),
            "planets" | "planet" => Ok(LookupKind::Planets),
            _ => Err(format!("Unknown lookup: {}. Use categories, deities, or planets", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puja_fallback_order() {
        let endpoints = Endpoints::defaults(ResourceKind::Puja);
        assert_eq!(
            endpoints.list,
            vec!["/api/puja/public", "/api/puja/all", "/api/puja/admin/all"]
        );
    }

    #[test]
    fn test_crud_paths() {
        let endpoints = Endpoints::defaults(ResourceKind::Gemstone);
        assert_eq!(endpoints.create, "/api/gemstones/create");
        assert_eq!(endpoints.item("abc"), "/api/gemstones/abc");

        let gallery = Endpoints::defaults(ResourceKind::Gallery);
        assert_eq!(gallery.list, vec!["/api/gallery/"]);
        assert_eq!(gallery.item("g1"), "/api/gallery/g1");
    }

    #[test]
    fn test_override_from_config() {
        let mut config = Config::default();
        config
            .endpoints
            .insert("puja".into(), vec!["/api/puja/admin/all".into()]);

        let endpoints = Endpoints::resolve(ResourceKind::Puja, &config);
        assert_eq!(endpoints.list, vec!["/api/puja/admin/all"]);
        assert_eq!(endpoints.create, "/api/puja/create");
    }

    #[test]
    fn test_lookup_paths() {
        assert_eq!(
            "planets".parse::<LookupKind>().unwrap().path(),
            "/api/rudraksha/planets/list"
        );
        assert!("zodiac".parse::<LookupKind>().is_err());
    }
}
