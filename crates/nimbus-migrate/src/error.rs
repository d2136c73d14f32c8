use thiserror::Error;

/// マイグレーション処理のエラー
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error(transparent)]
    Api(#[from] nimbus_api::ApiError),

    #[error(transparent)]
    Config(#[from] nimbus_config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no active region available")]
    NoActiveRegion,

    #[error("リージョン '{0}' が見つかりません")]
    RegionNotFound(String),

    #[error("no project to migrate")]
    NoProjects,

    #[error(
        "リージョン {0} からのマイグレーションは現在受け付けていません。\n先に `nimbus region` でリージョンを切り替えてください"
    )]
    FrozenRegion(String),

    #[error("移行元と同じリージョン ({0}) へはマイグレーションできません")]
    SameRegion(String),

    #[error("マイグレーションに失敗しました: {0}")]
    MigrationFailed(String),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
