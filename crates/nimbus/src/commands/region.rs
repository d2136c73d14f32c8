use colored::Colorize;
use nimbus_config::SessionConfig;
use nimbus_migrate::zone;
use std::path::Path;

/// `nimbus region`: 接続先リージョンを切り替えて保存
pub async fn handle(config_path: &Path) -> anyhow::Result<()> {
    let (config, client) = super::load_authenticated(config_path)?;

    let zones = client.get_zones().await?;

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout();
    let selected = zone::select_zone(zones, &mut stdin, &mut stdout)?;

    let config = SessionConfig {
        server: selected.endpoint.clone(),
        region: selected.name.clone(),
        ..config
    };
    config.save(config_path)?;

    println!("{}", "Region switched successfully.".green());
    Ok(())
}
