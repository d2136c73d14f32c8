//! ステップ進捗の自己上書き描画
//!
//! 毎tickの完全なスナップショットを同じ端末領域に描き直す。
//! 追記ログではなく常に最新の全体が見える。

use colored::Colorize;
use crossterm::{cursor, queue, terminal};
use nimbus_api::{JobState, ProgressResponse, Step};
use std::io::Write;

/// 前回描画した行数を覚えておき、次回はその分だけ巻き戻して描く
#[derive(Debug, Default)]
pub struct StatusScreen {
    rendered_lines: u16,
}

impl StatusScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// スナップショット全体を描画する
    pub fn render<W: Write>(
        &mut self,
        output: &mut W,
        progress: &ProgressResponse,
    ) -> std::io::Result<()> {
        if self.rendered_lines > 0 {
            queue!(
                output,
                cursor::MoveUp(self.rendered_lines),
                terminal::Clear(terminal::ClearType::FromCursorDown)
            )?;
        }

        let body = format_snapshot(progress);
        output.write_all(body.as_bytes())?;
        output.flush()?;

        self.rendered_lines = body.lines().count() as u16;
        Ok(())
    }
}

/// スナップショットを文字列にする（描画と分離してテスト可能に）
pub fn format_snapshot(progress: &ProgressResponse) -> String {
    let mut out = format!(
        "Migrating \"{}\": {} --> {}\n",
        progress.namespace, progress.source, progress.destination
    );

    let mut steps: Vec<&Step> = progress.steps.iter().collect();
    steps.sort_by_key(|s| s.order);

    for step in steps {
        out.push_str(&format_step(step));
    }
    out
}

fn format_step(step: &Step) -> String {
    let mark = match step.state {
        JobState::Pending => format!("{}", "[ ]".dimmed()),
        JobState::Running => format!("{}", "[~]".cyan()),
        JobState::Completed => format!("{}", "[✓]".green()),
        JobState::Failed => format!("{}", "[x]".red()),
    };

    match &step.data.detail {
        Some(detail) if !detail.is_empty() => {
            format!("{} {} {}\n", mark, step.title, format!("({})", detail).dimmed())
        }
        _ => format!("{} {}\n", mark, step.title),
    }
}
