//! 移行結果の差分レポート
//!
//! 純粋なレンダリングのみ。ネットワークにも状態にも触れない。
//! サービスIP・ルートは配列の同じ添字同士を対応させる
//! （名前ではなく位置で対応付ける。これはバックエンド側の契約）。

use colored::Colorize;
use nimbus_api::{JobState, ProgressResponse, Route, ZoneInfo};

/// 移行前後のZoneInfoペアから差分レポートを組み立てる
pub fn render_diff(source: &ZoneInfo, destination: &ZoneInfo) -> String {
    let mut out = String::new();

    if !source.services.is_empty() {
        out.push_str(&format!("{}\n", "Services:".bold()));
        for (old, new) in source.services.iter().zip(destination.services.iter()) {
            out.push_str(&format!(
                "  {}  {} --> {}\n",
                old.name,
                old.ip.red(),
                new.ip.green()
            ));
        }
    }

    // ルートは移行元側の is_free で二分する。移行先側も同じ添字が対応
    let (free, non_free): (Vec<usize>, Vec<usize>) =
        (0..source.routes.len()).partition(|&i| source.routes[i].is_free);

    if !free.is_empty() {
        out.push_str(&format!("{}\n", "Routes:".bold()));
        for i in free {
            let old = &source.routes[i];
            let new: Option<&Route> = destination.routes.get(i);
            match new {
                Some(new) => out.push_str(&format!(
                    "  {}  {} --> {}\n",
                    old.name,
                    old.host.red(),
                    new.host.green()
                )),
                None => out.push_str(&format!("  {}  {}\n", old.name, old.host)),
            }
        }
    }

    if !non_free.is_empty() {
        out.push_str(&format!("{}\n", "Custom domains:".bold()));
        for i in non_free {
            let route = &source.routes[i];
            out.push_str(&format!("  {}  {}\n", route.name, route.host));
        }
    }

    out.push_str(&format!("{}\n", "Gateway:".bold()));
    out.push_str(&format!(
        "  {} --> {}\n",
        source.gateway.red(),
        destination.gateway.green()
    ));

    out.push_str(&format!(
        "\n{}\n",
        "カスタムドメインのDNSレコードは自動では切り替わりません。新しいゲートウェイに向け直してください。"
            .yellow()
    ));

    out
}

/// ジョブの最終レポート
///
/// Completed なら終端ステップのペイロードから差分を描く。
/// Failed なら失敗詳細をそのまま出す。
pub fn render_final(progress: &ProgressResponse) -> String {
    match progress.state {
        JobState::Completed => {
            let payload = progress
                .terminal_step()
                .map(|step| (&step.data.source, &step.data.destination));
            match payload {
                Some((Some(source), Some(destination))) => format!(
                    "{}\n{}",
                    format!(
                        "✓ \"{}\" の {} --> {} への移行が完了しています",
                        progress.namespace, progress.source, progress.destination
                    )
                    .green(),
                    render_diff(source, destination)
                ),
                _ => format!(
                    "{}\n",
                    "✓ 移行は完了していますが、結果レポートがありません".green()
                ),
            }
        }
        JobState::Failed => format!("{}\n", failure_detail(progress).red()),
        _ => String::new(),
    }
}

/// 失敗したジョブの人間向けメッセージ
pub fn failure_detail(progress: &ProgressResponse) -> String {
    let detail = progress
        .steps
        .iter()
        .rev()
        .find(|s| s.state == JobState::Failed)
        .and_then(|s| s.data.detail.clone());

    match detail {
        Some(detail) => format!("failed to migrate: {}", detail),
        None => "failed to migrate".to_string(),
    }
}
