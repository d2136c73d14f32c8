use thiserror::Error;

/// 設定まわりのエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error("設定ファイルが見つかりません。`nimbus login` でログインしてください")]
    ConfigFileNotFound,

    #[error("設定ファイルの形式が不正です: {0}")]
    InvalidFormat(#[from] serde_yaml::Error),

    #[error("サーバーURLが設定されていません")]
    ServerNotSet,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
