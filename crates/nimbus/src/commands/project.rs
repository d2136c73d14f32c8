use colored::Colorize;
use std::path::Path;

/// `nimbus project list`: アクティブリージョンのプロジェクト一覧
pub async fn handle_list(config_path: &Path) -> anyhow::Result<()> {
    let (config, client) = super::load_authenticated(config_path)?;

    let projects = client.project_list().await?;
    if projects.is_empty() {
        println!(
            "{}",
            format!("リージョン {} にプロジェクトはありません", config.region).dimmed()
        );
        return Ok(());
    }

    println!("Projects in {}:", config.region.cyan());
    for project in projects {
        println!("  {}", project);
    }
    Ok(())
}
