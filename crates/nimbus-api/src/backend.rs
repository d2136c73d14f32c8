//! マイグレーション処理から見たバックエンドの抽象
//!
//! セッションコントローラとポーリングループはこのtrait越しにしか
//! サーバーと話さない。テストではフェイク実装に差し替える。

use crate::error::Result;
use crate::types::{JobLookup, MigrationRequest, ProgressResponse, Zone};
use async_trait::async_trait;

#[async_trait]
pub trait MigrationBackend: Send + Sync {
    /// ソースリージョンのジョブ状態を照会する
    async fn lookup_job(&self, region: &str) -> Result<JobLookup>;

    /// ポーリング1回分のスナップショットを取得する
    async fn fetch_progress(&self, region: &str) -> Result<ProgressResponse>;

    /// 新規マイグレーションジョブを作成する
    async fn submit_migration(&self, request: &MigrationRequest) -> Result<()>;

    /// ゾーンカタログを取得する
    async fn get_zones(&self) -> Result<Vec<Zone>>;

    /// アクティブリージョンのプロジェクト一覧を取得する
    async fn project_list(&self) -> Result<Vec<String>>;
}
