use colored::Colorize;
use nimbus_api::Client;
use nimbus_config::SessionConfig;
use nimbus_migrate::{prompt, zone};
use std::path::Path;

/// `nimbus login`: リージョン選択とAPIキーの取得・検証・保存
pub async fn handle(config_path: &Path) -> anyhow::Result<()> {
    let previous = SessionConfig::load_or_default(config_path)?;

    // 未ログインでもゾーンカタログは引けるようにデフォルトサーバーで
    // ブートストラップする
    let mut bootstrap = previous.clone();
    if bootstrap.server.is_empty() {
        bootstrap.server = nimbus_api::DEFAULT_API_SERVER.to_string();
    }
    let client = Client::new(&bootstrap)?;

    let zones = client.get_zones().await?;

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout();
    let selected = zone::select_zone(zones, &mut stdin, &mut stdout)?;

    let api_key = read_api_key(&previous, &mut stdin, &mut stdout)?;

    let config = SessionConfig {
        server: selected.endpoint.clone(),
        region: selected.name.clone(),
        api_key,
        ..previous
    };

    // 保存する前に認証情報を検証する
    let client = Client::new(&config)?;
    client.get_user_info(&config.api_key).await?;

    config.save(config_path)?;
    println!(
        "{}",
        "Valid Authorization credentials. Logged in successfully!".green()
    );
    Ok(())
}

/// APIキーを読む。保存済みキーがあればデフォルトにする
fn read_api_key<R, W>(
    previous: &SessionConfig,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<String>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    let pattern = regex::Regex::new(r"^(A|a)pikey [a-z0-9\-]+$").unwrap();

    let prompt_text = if previous.has_credentials() {
        format!("Enter API token [{}]: ", previous.api_key)
    } else {
        "Enter API token: ".to_string()
    };
    let default = previous.has_credentials().then_some(previous.api_key.as_str());

    prompt::read_input(input, output, &prompt_text, default, |value| {
        if pattern.is_match(value) {
            Ok(())
        } else {
            Err("API token should be in format: 'Apikey xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx'"
                .to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_api_key_format_validation() {
        let previous = SessionConfig::default();
        let mut input = Cursor::new("not-a-token\nApikey 0123-abcd\n");
        let mut output = Vec::new();

        let key = read_api_key(&previous, &mut input, &mut output).unwrap();
        assert_eq!(key, "Apikey 0123-abcd");

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("API token should be in format"));
    }

    #[test]
    fn test_read_api_key_defaults_to_saved_key() {
        let previous = SessionConfig {
            api_key: "Apikey dead-beef".to_string(),
            ..Default::default()
        };
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();

        let key = read_api_key(&previous, &mut input, &mut output).unwrap();
        assert_eq!(key, "Apikey dead-beef");
    }
}
