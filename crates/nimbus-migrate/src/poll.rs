//! ポーリングエンジン
//!
//! 固定間隔のtickerで1tickにつき1回スナップショットを取得し、
//! 終端状態か通信エラーでのみ抜ける単一ループ。Ctrl-Cの特別扱いは
//! しない（サーバー側ジョブは生き続け、次回起動で再接続できる）。

use crate::error::{MigrateError, Result};
use crate::render::StatusScreen;
use crate::report;
use nimbus_api::{JobState, MigrationBackend};
use std::io::Write;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// デフォルトのポーリング間隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// ジョブが終端状態になるまでポーリングする
///
/// - 取得失敗は即時中断（このループ内でのリトライはしない）
/// - Completed: 終端ステップのペイロードで差分レポートを出して成功
/// - Failed: 失敗詳細をエラーとして返す
pub async fn run<B, W>(
    backend: &B,
    region: &str,
    interval: Duration,
    output: &mut W,
) -> Result<()>
where
    B: MigrationBackend + ?Sized,
    W: Write,
{
    let mut ticker = tokio::time::interval(interval);
    // 1tick分の遅延は次tickに重ねない（リクエストが多重化しない）
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut screen = StatusScreen::new();

    loop {
        ticker.tick().await;

        let progress = backend.fetch_progress(region).await?;
        tracing::debug!(state = ?progress.state, steps = progress.steps.len(), "poll tick");
        screen.render(output, &progress)?;

        match progress.state {
            JobState::Completed => {
                writeln!(output)?;
                write!(output, "{}", report::render_final(&progress))?;
                output.flush()?;
                return Ok(());
            }
            JobState::Failed => {
                writeln!(output)?;
                return Err(MigrateError::MigrationFailed(report::failure_detail(
                    &progress,
                )));
            }
            JobState::Pending | JobState::Running => {}
        }
    }
}
