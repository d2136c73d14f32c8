//! マイグレーションリクエストの組み立て
//!
//! (namespace, source, destination) の不変トリプルを作り、送信前の
//! 静的な業務ルール検証と確認ゲートを通す。

use crate::error::{MigrateError, Result};
use crate::prompt;
use nimbus_api::{MigrationRequest, Zone};
use nimbus_config::region_from_endpoint;
use std::io::{BufRead, Write};

/// マイグレーション凍結中のリージョン
///
/// ここをソースとする移行はサーバーに問い合わせるまでもなく拒否する
/// （静的な業務ルール）。
pub const FROZEN_REGION: &str = "ir-thr-ba1";

/// 凍結リージョンからの移行を拒否する
pub fn ensure_not_frozen(source: &str) -> Result<()> {
    if source == FROZEN_REGION {
        return Err(MigrateError::FrozenRegion(source.to_string()));
    }
    Ok(())
}

/// 移行先が移行元と同一リージョンでないことを確認する
pub fn ensure_different_region(source: &str, destination: &Zone) -> Result<()> {
    if source == region_from_endpoint(&destination.endpoint) {
        return Err(MigrateError::SameRegion(source.to_string()));
    }
    Ok(())
}

/// プロジェクト（ネームスペース）を番号選択する。デフォルトは1番
pub fn select_project<R, W>(projects: &[String], input: &mut R, output: &mut W) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    if projects.is_empty() {
        return Err(MigrateError::NoProjects);
    }

    writeln!(output, "Select project:")?;
    for (i, project) in projects.iter().enumerate() {
        writeln!(output, "  [{}] {}", i + 1, project)?;
    }

    let index = prompt::select_index(input, output, "Project Number[1]: ", projects.len())?;
    Ok(projects[index].clone())
}

/// 確認ゲート: ネームスペース名をそのまま打たせる
///
/// この操作は稼働中のトラフィックを止めるため、Y/nではなく
/// 対象名の完全一致を要求する。一致するまで再入力。
pub fn confirm_migration<R, W>(
    namespace: &str,
    destination: &str,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "\"{}\" を {} に移行します。移行中はアプリケーションへのトラフィックが停止します。",
        namespace, destination
    )?;

    let prompt_text = format!("続行するにはプロジェクト名 ({}) を入力: ", namespace);
    prompt::read_input(input, output, &prompt_text, None, |value| {
        if value == namespace {
            Ok(())
        } else {
            Err(format!("'{}' と完全に一致する入力が必要です", namespace))
        }
    })?;

    Ok(())
}

/// 不変のリクエスト値を組み立てる
///
/// destination は `{region_name}-{zone_name}` の完全修飾IDで送る。
pub fn build_request(namespace: &str, source: &str, destination: &Zone) -> MigrationRequest {
    MigrationRequest {
        namespace: namespace.to_string(),
        source: source.to_string(),
        destination: destination.qualified_name(),
    }
}
