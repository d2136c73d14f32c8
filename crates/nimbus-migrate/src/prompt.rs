//! 対話入力の読み取りループ
//!
//! 検証に通るまで再入力を促し続ける。リーダ/ライタはジェネリクスで
//! 受けるので、テストでは `Cursor` と `Vec<u8>` を差し込める。

use std::io::{BufRead, Write};

/// プロンプトを表示して1行読み、検証に通った入力を返す
///
/// - 空入力で `default` があればデフォルト値を返す
/// - 検証エラーはメッセージを表示して再入力（回数制限なし）
/// - EOFは対話の続行が不可能なのでエラー
pub fn read_input<R, W, F>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: Option<&str>,
    mut validate: F,
) -> std::io::Result<String>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<(), String>,
{
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        let n = input.read_line(&mut line)?;
        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "入力が閉じられました",
            ));
        }

        let value = line.trim();
        if value.is_empty() {
            if let Some(default) = default {
                return Ok(default.to_string());
            }
        }

        match validate(value) {
            Ok(()) => return Ok(value.to_string()),
            Err(msg) => writeln!(output, "Error: {}", msg)?,
        }
    }
}

/// 1〜upper の番号選択。返り値は0始まりのインデックス
pub fn select_index<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    upper: usize,
) -> std::io::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let chosen = read_input(input, output, prompt, Some("1"), |value| {
        match value.parse::<usize>() {
            Ok(n) if (1..=upper).contains(&n) => Ok(()),
            _ => Err(format!("enter a number between '1' and '{}'", upper)),
        }
    })?;

    // validateを通った値なのでparseは失敗しない
    Ok(chosen.parse::<usize>().unwrap() - 1)
}

/// y/N の確認。空入力はNo
pub fn confirm_yes_no<R, W>(input: &mut R, output: &mut W, prompt: &str) -> std::io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let answer = read_input(input, output, prompt, Some("n"), |value| {
        match value {
            "y" | "Y" | "n" | "N" => Ok(()),
            _ => Err("enter 'y' for \"yes\" or 'n' for \"no\"".to_string()),
        }
    })?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
