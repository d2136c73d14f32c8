//! Platform APIのワイヤ型
//!
//! ゾーンカタログとマイグレーションジョブのレスポンス形式。
//! すべてリクエストスコープの読み取り専用データで、取得後に
//! 書き換えられることはない。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /paas/v1/zones` のレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneCatalog {
    #[serde(rename = "data", default)]
    pub zones: Vec<Zone>,
}

/// ひとつのデプロイリージョン（エッジ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub endpoint: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub release: String,
    #[serde(rename = "default", default)]
    pub is_default: bool,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub region_city: String,
    #[serde(default)]
    pub region_country: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// 稼働ステータス値。これ以外のステータスはすべて利用不可扱い
pub const ZONE_STATUS_UP: &str = "UP";

/// 安定版リリースチャネル。これ以外は表示時にラベルを付ける
pub const RELEASE_STABLE: &str = "STABLE";

impl Zone {
    /// ゾーンが稼働中（選択可能）かどうか
    pub fn is_up(&self) -> bool {
        self.status == ZONE_STATUS_UP
    }

    /// `{region_name}-{name}` 形式の完全修飾リージョンID
    ///
    /// マイグレーション先の識別子はこの形式でサーバーに送る。
    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.region_name, self.name)
    }

    /// 一覧表示用のラベル。安定版以外はリリースチャネルを併記
    pub fn display_label(&self) -> String {
        if self.release == RELEASE_STABLE {
            self.qualified_name()
        } else {
            format!("{}({})", self.qualified_name(), self.release)
        }
    }
}

/// マイグレーションジョブ作成リクエスト
///
/// 1回の起動につき一度だけ構築され、送信後は変更されない。
/// サーバー側はソースリージョンをキーにジョブを一意に管理する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub namespace: String,
    pub source: String,
    pub destination: String,
}

/// ジョブ全体・各ステップの状態
///
/// 単一ジョブ内の遷移は Pending → Running → {Completed, Failed} の
/// 単調な一方向のみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    /// Completed / Failed 以降の遷移は存在しない
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// サーバーが報告するジョブのスナップショット
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub state: JobState,
    pub source: String,
    pub destination: String,
    pub namespace: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl ProgressResponse {
    /// 終端ステップ（最大ordinal）のデータペイロード
    pub fn terminal_step(&self) -> Option<&Step> {
        self.steps.iter().max_by_key(|s| s.order)
    }
}

/// マイグレーションの1ステップ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub order: u32,
    pub name: String,
    pub title: String,
    pub state: JobState,
    #[serde(default)]
    pub data: StepData,
}

/// ステップごとのデータペイロード
///
/// 終端ステップだけが source/destination の ZoneInfo 比較ペアを持つ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ZoneInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<ZoneInfo>,
}

/// マイグレーション前後のゾーン側リソース情報
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneInfo {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub ip: String,
}

/// ルート（ドメイン）。is_free がプラットフォーム提供ドメインかどうか
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub host: String,
    pub is_free: bool,
}

/// ジョブ照会の結果。HTTPステータスコードから一度だけ導出する
///
/// 以降のロジックはこのタグ付き列挙だけを見る。ステータスコードに
/// 業務上の意味を重ね持たせない（404=ジョブなし、200=既存ジョブ、
/// 302=実行中ジョブあり）。
#[derive(Debug, Clone)]
pub enum JobLookup {
    /// ジョブは存在しない。新規作成できる
    NoJob,
    /// 既存ジョブのスナップショットが返った（終端状態の可能性あり）
    Existing(ProgressResponse),
    /// 実行中のジョブがある。作成はスキップしてポーリングに直行する
    Active,
}

/// `GET /update` のレスポンス。204 のときは最新版（None）
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInfo {
    pub url: String,
    pub version: String,
}
