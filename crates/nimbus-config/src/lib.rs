pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイルのスキーマバージョン
pub const API_VERSION: &str = "1";

/// CLIセッションの設定（サーバーURL・リージョン・APIキー）
///
/// ログイン時に一度だけ構築・保存され、各コンポーネントには
/// 参照で渡される。セッション中に書き換えられることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub region: String,
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            server: String::new(),
            region: String::new(),
            api_key: String::new(),
        }
    }
}

impl SessionConfig {
    /// 設定ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::ConfigFileNotFound);
        }
        let data = std::fs::read_to_string(path)?;
        let config: SessionConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    /// 設定ファイルから読み込む。未ログイン（ファイルなし）はデフォルト値
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::ConfigFileNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// 設定ファイルに保存する
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_yaml::to_string(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// APIキーが保存されているか
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// サーバーURLの最終パスセグメントをリージョン名として返す
    ///
    /// ゾーンの endpoint は `https://.../paas/v1/regions/<region>` の
    /// 形式で配布されるため、接続先リージョンはURL末尾から決まる。
    pub fn source_region(&self) -> Result<&str> {
        if self.server.is_empty() {
            return Err(ConfigError::ServerNotSet);
        }
        Ok(region_from_endpoint(&self.server))
    }
}

/// エンドポイントURLの最終 `/` 以降をリージョン名として切り出す
pub fn region_from_endpoint(endpoint: &str) -> &str {
    match endpoint.rfind('/') {
        Some(idx) => &endpoint[idx + 1..],
        None => endpoint,
    }
}

/// Nimbus CLIの設定ディレクトリを取得（なければ作成）
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("nimbus");

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// 設定ファイルのパスを決定
///
/// 環境変数 NIMBUS_CONFIG_PATH が設定されていればそちらを優先。
pub fn config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("NIMBUS_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join("config.yaml"))
}
