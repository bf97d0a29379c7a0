use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("通信エラー: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("すべてのエンドポイントで取得に失敗しました: {}", .attempts.join("; "))]
    AllEndpointsFailed { attempts: Vec<String> },

    #[error("Unexpected response format")]
    UnexpectedFormat,

    #[error("入力エラー: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("送信中のリクエストがあります。完了してから再度実行してください")]
    Busy,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Common(astro_catalog_common::Error),
}

impl From<astro_catalog_common::Error> for CatalogError {
    fn from(err: astro_catalog_common::Error) -> Self {
        use astro_catalog_common::Error as E;
        match err {
            E::Validation { field, message } => CatalogError::Validation { field, message },
            E::UnexpectedFormat => CatalogError::UnexpectedFormat,
            E::Io(e) => CatalogError::Io(e),
            E::Json(e) => CatalogError::JsonParse(e),
            other => CatalogError::Common(other),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Network(format!("タイムアウト: {}", err))
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
