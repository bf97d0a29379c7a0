//! プージャ・ルドラクシャ・宝石・ブログ・ギャラリーのカタログAPIクライアント

pub mod cli;
pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;

pub use collection::{CollectionState, Refresh, RemoteCollection};
pub use error::{CatalogError, Result};
