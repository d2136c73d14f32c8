mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(about = "Nimbus cloud PaaSのコマンドラインクライアント", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nimbus APIにログインして認証情報を保存
    Login,
    /// 接続先リージョンを切り替え
    Region,
    /// プロジェクトを別リージョンへマイグレーション
    Migrate {
        /// 移行先ゾーン名（省略時は対話選択）
        #[arg(long = "to")]
        destination: Option<String>,
    },
    /// プロジェクトを管理
    #[command(subcommand)]
    Project(ProjectCommands),
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// アクティブリージョンのプロジェクト一覧を表示
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrに出力
    tracing_subscriber::fmt::init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("nimbus {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config_path = nimbus_config::config_file_path()?;

    match cli.command {
        Commands::Login => {
            commands::login::handle(&config_path).await?;
        }
        Commands::Region => {
            commands::region::handle(&config_path).await?;
        }
        Commands::Migrate { destination } => {
            commands::migrate::handle(&config_path, destination).await?;
        }
        Commands::Project(ProjectCommands::List) => {
            commands::project::handle_list(&config_path).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
