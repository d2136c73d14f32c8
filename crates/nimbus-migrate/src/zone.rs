//! ゾーンカタログの解決
//!
//! 取得したゾーン一覧を稼働中/停止中に分け、名前または対話選択で
//! 移行先ゾーンを決める。

use crate::error::{MigrateError, Result};
use crate::prompt;
use nimbus_api::Zone;
use std::io::{BufRead, Write};

/// 稼働ステータスで厳密に二分する
///
/// 返り値は (選択可能, 利用不可)。両者は互いに素で、合わせると
/// 入力と同じ集合になる。
pub fn partition(zones: Vec<Zone>) -> (Vec<Zone>, Vec<Zone>) {
    zones.into_iter().partition(|z| z.is_up())
}

/// 名前で稼働中ゾーンを解決する。見つからなければハードエラー
pub fn resolve_by_name(zones: &[Zone], name: &str) -> Result<Zone> {
    zones
        .iter()
        .filter(|z| z.is_up())
        .find(|z| z.name == name || z.qualified_name() == name)
        .cloned()
        .ok_or_else(|| MigrateError::RegionNotFound(name.to_string()))
}

/// 表示順: デフォルトゾーンを先頭に、それ以外を後ろに
///
/// 選択番号は表示順に振るので、この並び替え後の配列が
/// インデックスの正になる。
fn display_order(up: Vec<Zone>) -> Vec<Zone> {
    let (defaults, rest): (Vec<Zone>, Vec<Zone>) = up.into_iter().partition(|z| z.is_default);
    let mut ordered = defaults;
    ordered.extend(rest);
    ordered
}

/// 選択肢の一覧を組み立てる。停止中ゾーンは番号なしで末尾に出す
fn format_zone_list(up: &[Zone], down: &[Zone]) -> String {
    let mut result = String::new();
    for (i, zone) in up.iter().enumerate() {
        result.push_str(&format!("  [{}] {}\n", i + 1, zone.display_label()));
    }
    for zone in down {
        result.push_str(&format!("  [-] {} (down)\n", zone.qualified_name()));
    }
    result
}

/// 対話でゾーンを選択する
///
/// 稼働中ゾーンがちょうど1つなら入力を求めず自動選択する。
/// 稼働中ゾーンが無い場合はプロンプトを出す前に失敗する。
pub fn select_zone<R, W>(zones: Vec<Zone>, input: &mut R, output: &mut W) -> Result<Zone>
where
    R: BufRead,
    W: Write,
{
    let (up, down) = partition(zones);
    if up.is_empty() {
        return Err(MigrateError::NoActiveRegion);
    }

    let up = display_order(up);

    write!(output, "Select region:\n{}", format_zone_list(&up, &down))?;

    if up.len() == 1 {
        writeln!(output, "Region Number[1]: 1")?;
        return Ok(up.into_iter().next().unwrap());
    }

    let index = prompt::select_index(input, output, "Region Number[1]: ", up.len())?;
    Ok(up.into_iter().nth(index).unwrap())
}
