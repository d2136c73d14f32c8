use nimbus_migrate::Session;
use std::path::Path;

/// `nimbus migrate`: マイグレーションセッションを実行
///
/// 再実行しても安全: サーバー側の状態を照会してから投入するか
/// 監視に接続するかを決める。
pub async fn handle(config_path: &Path, destination: Option<String>) -> anyhow::Result<()> {
    let (config, client) = super::load_authenticated(config_path)?;

    super::print_update_notice(&client).await;

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout();

    Session::new(&client, &config)
        .with_destination(destination)
        .run(&mut stdin, &mut stdout)
        .await?;

    Ok(())
}
