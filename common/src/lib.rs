//! Catalog Common Library
//!
//! CLIとHTTPクライアントで共有される型と一覧処理

pub mod types;
pub mod envelope;
pub mod filter;
pub mod sort;
pub mod pagination;
pub mod draft;
pub mod patch;
pub mod error;

pub use types::{ListItem, ResourceKind, DEFAULT_RATING};
pub use envelope::{check_status_body, error_message, normalize_item, normalize_items, normalize_lookup, Envelope};
pub use filter::{distinct_categories, view, Criteria, PriceRange};
pub use sort::SortKey;
pub use pagination::{paginate, Page, DEFAULT_PER_PAGE};
pub use draft::{Attachment, FieldValue, FormDraft, SubmitMode};
pub use patch::{apply, Mutation};
pub use error::{Error, Result};
