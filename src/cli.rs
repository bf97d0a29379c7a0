use crate::client::LookupKind;
use astro_catalog_common::{FieldValue, PriceRange, ResourceKind, SortKey};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "astro-catalog")]
#[command(about = "プージャ・ルドラクシャ・宝石カタログの閲覧・管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 一覧を取得して絞り込み・並び替え表示
    List {
        /// リソース (puja/rudraksha/gemstone/blog/gallery)
        #[arg(required = true)]
        resource: ResourceKind,

        /// カテゴリ（all で全件）
        #[arg(short, long)]
        category: Option<String>,

        /// 場所
        #[arg(short, long)]
        location: Option<String>,

        /// 検索語（名前・説明・神格・カテゴリ・タグ）
        #[arg(short, long)]
        search: Option<String>,

        /// ステータス (published/draft など)
        #[arg(long)]
        status: Option<String>,

        /// 価格帯 (all / 1000-5000 / 5000+ / -1000)
        #[arg(short, long)]
        price: Option<PriceRange>,

        /// 並び順 (popularity/price-low/price-high/rating/newest)
        #[arg(long, default_value = "popularity")]
        sort: SortKey,

        /// 非公開の項目も含める
        #[arg(short, long)]
        all: bool,

        /// ページ番号（1始まり）
        #[arg(long, default_value = "1")]
        page: usize,

        /// 1ページあたりの件数（省略時は設定値）
        #[arg(long)]
        per_page: Option<usize>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 新規作成
    Create {
        #[arg(required = true)]
        resource: ResourceKind,

        /// フィールド (key=value)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, FieldValue)>,

        /// リストフィールド (key=a,b,c)
        #[arg(short, long = "list", value_parser = parse_list)]
        lists: Vec<(String, FieldValue)>,

        /// 添付ファイル (field=path)
        #[arg(long = "file", value_parser = parse_file)]
        files: Vec<(String, PathBuf)>,
    },

    /// 更新
    Update {
        #[arg(required = true)]
        resource: ResourceKind,

        /// 項目ID
        #[arg(required = true)]
        id: String,

        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, FieldValue)>,

        #[arg(short, long = "list", value_parser = parse_list)]
        lists: Vec<(String, FieldValue)>,

        #[arg(long = "file", value_parser = parse_file)]
        files: Vec<(String, PathBuf)>,
    },

    /// 削除
    Delete {
        #[arg(required = true)]
        resource: ResourceKind,

        #[arg(required = true)]
        id: String,

        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// ルドラクシャの参照リストを表示
    Lookup {
        /// categories/deities/planets
        #[arg(required = true)]
        kind: LookupKind,
    },

    /// 設定を表示/編集
    Config {
        /// 接続先URLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 認証トークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

fn split_pair(s: &str) -> Result<(&str, &str), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("key=value 形式で指定してください: {}", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("キーが空です: {}", s));
    }
    Ok((key, value))
}

/// `--field price=1600` を解析
pub fn parse_field(s: &str) -> Result<(String, FieldValue), String> {
    let (key, value) = split_pair(s)?;
    Ok((key.to_string(), FieldValue::infer(value)))
}

/// `--list benefits=Wisdom,Prosperity` を解析
pub fn parse_list(s: &str) -> Result<(String, FieldValue), String> {
    let (key, value) = split_pair(s)?;
    let items = value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((key.to_string(), FieldValue::List(items)))
}

/// `--file image=./front.jpg` を解析
pub fn parse_file(s: &str) -> Result<(String, PathBuf), String> {
    let (key, value) = split_pair(s)?;
    if value.trim().is_empty() {
        return Err(format!("ファイルパスが空です: {}", s));
    }
    Ok((key.to_string(), PathBuf::from(value.trim())))
}
