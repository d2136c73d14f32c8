//! Platform APIへのHTTPクライアント
//!
//! エンドポイントは2系統ある:
//! - ホスト直下 (`/paas/v1/zones`, `/g/user`, `/paas/v1/migrations/...`)
//! - リージョンスコープ（設定済みサーバーURL配下の `/projects` など）

use crate::backend::MigrationBackend;
use crate::error::{ApiError, Result};
use crate::types::{
    JobLookup, MigrationRequest, ProgressResponse, UpdateInfo, Zone, ZoneCatalog,
};
use async_trait::async_trait;
use nimbus_config::SessionConfig;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// 未ログイン時にゾーンカタログを引くためのデフォルトAPIサーバー
pub const DEFAULT_API_SERVER: &str = "https://api.nimbus.dev";

const ZONES_PATH: &str = "/paas/v1/zones";
const USER_PATH: &str = "/g/user";
const MIGRATIONS_PATH: &str = "/paas/v1/migrations";
const UPDATE_ENDPOINT: &str = "https://get.nimbus.dev/update";
const USER_AGENT: &str = concat!("nimbus-cli/", env!("CARGO_PKG_VERSION"));

/// Platform APIクライアント
///
/// セッション設定から一度だけ構築し、以降は読み取り専用で使う。
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    /// スキーム+ホストまでのベースURL（末尾スラッシュなし）
    host_base: String,
    /// リージョンスコープのサーバーURL（ゾーンのendpointそのもの）
    region_base: String,
    api_key: String,
}

impl Client {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let url = Url::parse(&config.server)
            .map_err(|_| ApiError::InvalidServerUrl(config.server.clone()))?;
        let host = url
            .host_str()
            .ok_or_else(|| ApiError::InvalidServerUrl(config.server.clone()))?;

        let mut host_base = format!("{}://{}", url.scheme(), host);
        if let Some(port) = url.port() {
            host_base = format!("{}:{}", host_base, port);
        }

        // 302を「実行中ジョブあり」のシグナルとして読むため、
        // リダイレクトの自動追従は無効にする
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            host_base,
            region_base: config.server.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url).header("accept", "application/json");
        if !self.api_key.is_empty() {
            req = req.header("Authorization", &self.api_key);
        }
        req
    }

    /// ゾーンカタログを取得する。キャッシュはなく毎回取り直す
    pub async fn get_zones(&self) -> Result<Vec<Zone>> {
        let url = format!("{}{}", self.host_base, ZONES_PATH);
        tracing::debug!(%url, "fetching zone catalog");

        let resp = self.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let body = resp.text().await?;
        let catalog: ZoneCatalog = serde_json::from_str(&body)?;
        Ok(catalog.zones)
    }

    /// APIキーの有効性を確認し、ユーザー情報を返す
    pub async fn get_user_info(&self, api_key: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.host_base, USER_PATH);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .header("Authorization", api_key)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(resp.json().await?),
            s if s.is_client_error() => Err(ApiError::Unauthorized),
            s => Err(ApiError::UnexpectedStatus(s.as_u16())),
        }
    }

    /// アクティブなリージョンのプロジェクト（ネームスペース）一覧
    pub async fn project_list(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct ProjectItem {
            name: String,
        }
        #[derive(Deserialize)]
        struct ProjectList {
            #[serde(default)]
            items: Vec<ProjectItem>,
        }

        let url = format!("{}/projects", self.region_base);
        let resp = self.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }

        let list: ProjectList = serde_json::from_str(&resp.text().await?)?;
        Ok(list.items.into_iter().map(|p| p.name).collect())
    }

    /// 新しいバージョンが配布されていれば返す
    ///
    /// 204 No Content は「最新版」の意味で、エラーではない。
    pub async fn check_update(&self) -> Result<Option<UpdateInfo>> {
        let resp = self
            .http
            .get(UPDATE_ENDPOINT)
            .header("accept", "application/json")
            .send()
            .await?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(None),
            s if s.is_success() => {
                let update: UpdateInfo = serde_json::from_str(&resp.text().await?)?;
                Ok(Some(update))
            }
            s => Err(ApiError::UnexpectedStatus(s.as_u16())),
        }
    }

    fn migrations_url(&self, region: &str) -> String {
        format!("{}{}/{}", self.host_base, MIGRATIONS_PATH, region)
    }
}

/// 400のボディに入るサーバーメッセージ
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

async fn bad_request_message(resp: reqwest::Response) -> ApiError {
    let message = match resp.text().await {
        Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) if !parsed.message.is_empty() => parsed.message,
            _ => body,
        },
        Err(_) => String::new(),
    };
    if message.is_empty() {
        ApiError::BadRequest("bad request".to_string())
    } else {
        ApiError::BadRequest(message)
    }
}

fn status_error(status: StatusCode) -> ApiError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ApiError::Unauthorized
    } else {
        ApiError::UnexpectedStatus(status.as_u16())
    }
}

#[async_trait]
impl MigrationBackend for Client {
    /// ジョブ照会。HTTPステータスを一度だけ JobLookup に変換する
    async fn lookup_job(&self, region: &str) -> Result<JobLookup> {
        let resp = self.get(self.migrations_url(region)).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(JobLookup::NoJob),
            StatusCode::FOUND => Ok(JobLookup::Active),
            StatusCode::BAD_REQUEST => Err(bad_request_message(resp).await),
            s if s.is_success() => {
                let progress: ProgressResponse = serde_json::from_str(&resp.text().await?)?;
                Ok(JobLookup::Existing(progress))
            }
            s => Err(status_error(s)),
        }
    }

    /// ポーリング用のスナップショット取得
    ///
    /// 実行中ジョブは200でも302でもスナップショットを同梱して返す。
    async fn fetch_progress(&self, region: &str) -> Result<ProgressResponse> {
        let resp = self.get(self.migrations_url(region)).send().await?;

        match resp.status() {
            StatusCode::BAD_REQUEST => Err(bad_request_message(resp).await),
            s if s.is_success() || s == StatusCode::FOUND => {
                let progress: ProgressResponse = serde_json::from_str(&resp.text().await?)?;
                Ok(progress)
            }
            s => Err(status_error(s)),
        }
    }

    /// マイグレーションジョブを作成する
    async fn submit_migration(&self, request: &MigrationRequest) -> Result<()> {
        let url = self.migrations_url(&request.source);
        tracing::info!(
            namespace = %request.namespace,
            source = %request.source,
            destination = %request.destination,
            "submitting migration"
        );

        let mut req = self
            .http
            .post(url)
            .header("accept", "application/json")
            .json(request);
        if !self.api_key.is_empty() {
            req = req.header("Authorization", &self.api_key);
        }
        let resp = req.send().await?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::BAD_REQUEST => Err(bad_request_message(resp).await),
            s => Err(status_error(s)),
        }
    }

    async fn get_zones(&self) -> Result<Vec<Zone>> {
        Client::get_zones(self).await
    }

    async fn project_list(&self) -> Result<Vec<String>> {
        Client::project_list(self).await
    }
}
