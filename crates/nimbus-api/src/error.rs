//! API client error types

use thiserror::Error;

/// Platform API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("サーバーURLが不正です: {0}")]
    InvalidServerUrl(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("レスポンスの形式が不正です: {0}")]
    Format(#[from] serde_json::Error),

    #[error("invalid authorization credentials。`nimbus login` でログインし直してください")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("server error (HTTP {0})。しばらくしてから再試行してください")]
    UnexpectedStatus(u16),
}

pub type Result<T> = std::result::Result<T, ApiError>;
