pub mod login;
pub mod migrate;
pub mod project;
pub mod region;

use anyhow::Context;
use colored::Colorize;
use nimbus_api::Client;
use nimbus_config::SessionConfig;
use std::path::Path;

/// 認証済みセッションを要求するコマンドの共通前処理
pub fn load_authenticated(config_path: &Path) -> anyhow::Result<(SessionConfig, Client)> {
    let config = SessionConfig::load(config_path)
        .context("設定を読み込めませんでした")?;

    if !config.has_credentials() {
        anyhow::bail!("no authorization credentials provided。`nimbus login` でログインしてください");
    }

    let client = Client::new(&config)?;
    Ok((config, client))
}

/// 新バージョンが配布されていれば通知する
///
/// 通知できない（ネットワークエラー等）のは致命的ではないので無視。
pub async fn print_update_notice(client: &Client) {
    match client.check_update().await {
        Ok(Some(update)) => {
            let bar = "*".repeat(50);
            println!("{}", bar.dimmed());
            println!(
                "  Update available {} -> {}",
                env!("CARGO_PKG_VERSION").yellow(),
                update.version.green()
            );
            println!("  {}", update.url.cyan());
            println!("{}", bar.dimmed());
        }
        // 最新版（204）は何も出さない
        Ok(None) => {}
        Err(e) => tracing::debug!("update check failed: {}", e),
    }
}
