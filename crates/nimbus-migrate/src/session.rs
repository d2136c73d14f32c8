//! マイグレーションセッションの状態機械
//!
//! CLIは起動間で状態を持たないため、サーバー上の「いま何が真か」を
//! 先に照会してから変更を加えるかどうかを決める。これが再入可能性の
//! 核心: 二重投入しても並行ジョブは生まれず、完了後の再実行は前回の
//! 結果を再表示する。

use crate::error::Result;
use crate::poll;
use crate::report;
use crate::request;
use crate::zone;
use colored::Colorize;
use nimbus_api::{JobLookup, MigrationBackend};
use nimbus_config::SessionConfig;
use std::io::{BufRead, Write};
use std::time::Duration;

pub struct Session<'a, B: MigrationBackend + ?Sized> {
    backend: &'a B,
    config: &'a SessionConfig,
    poll_interval: Duration,
    destination_name: Option<String>,
}

impl<'a, B: MigrationBackend + ?Sized> Session<'a, B> {
    pub fn new(backend: &'a B, config: &'a SessionConfig) -> Self {
        Self {
            backend,
            config,
            poll_interval: poll::DEFAULT_POLL_INTERVAL,
            destination_name: None,
        }
    }

    /// ポーリング間隔を差し替える（テスト用に短くできる）
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// 移行先ゾーンを名前で固定する（指定時は対話選択を行わない）
    pub fn with_destination(mut self, name: Option<String>) -> Self {
        self.destination_name = name;
        self
    }

    /// セッション全体を実行する
    ///
    /// 照会 → (再表示 / 新規投入 / 投入スキップ) → ポーリング。
    pub async fn run<R, W>(&self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let source = self.config.source_region()?.to_string();

        let lookup = self.backend.lookup_job(&source).await?;
        tracing::debug!(%source, ?lookup, "job lookup");

        match lookup {
            JobLookup::Active => {
                // 実行中ジョブがある。投入はせず監視に直行
                writeln!(
                    output,
                    "{}",
                    "このリージョンのマイグレーションは実行中です。監視を再開します。".cyan()
                )?;
            }
            JobLookup::Existing(progress) if progress.state.is_terminal() => {
                // 前回ジョブの最終結果を必ず先に見せる
                write!(output, "{}", report::render_final(&progress))?;
                writeln!(output)?;

                let restart = crate::prompt::confirm_yes_no(
                    input,
                    output,
                    "新しいマイグレーションを開始しますか?[y/N]: ",
                )?;
                if !restart {
                    return Ok(());
                }
                self.submit_new(&source, input, output).await?;
            }
            JobLookup::Existing(_) => {
                // 200で返ったが未終端。既存ジョブに接続する
                writeln!(
                    output,
                    "{}",
                    "既存のマイグレーションに接続します。".cyan()
                )?;
            }
            JobLookup::NoJob => {
                self.submit_new(&source, input, output).await?;
            }
        }

        poll::run(self.backend, &source, self.poll_interval, output).await
    }

    /// リクエストビルダーを回して新規ジョブを投入する
    async fn submit_new<R, W>(&self, source: &str, input: &mut R, output: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        // 静的ルール: 凍結リージョンはバックエンドに問い合わせる前に拒否
        request::ensure_not_frozen(source)?;

        let projects = self.backend.project_list().await?;
        let namespace = request::select_project(&projects, input, output)?;

        let zones = self.backend.get_zones().await?;
        let destination = match &self.destination_name {
            Some(name) => zone::resolve_by_name(&zones, name)?,
            None => zone::select_zone(zones, input, output)?,
        };
        request::ensure_different_region(source, &destination)?;

        request::confirm_migration(&namespace, &destination.qualified_name(), input, output)?;

        let migration = request::build_request(&namespace, source, &destination);
        self.backend.submit_migration(&migration).await?;

        writeln!(
            output,
            "{}",
            format!(
                "マイグレーションを開始しました: \"{}\" {} --> {}",
                migration.namespace, migration.source, migration.destination
            )
            .green()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;
    use async_trait::async_trait;
    use nimbus_api::{
        JobState, MigrationRequest, ProgressResponse, Service, Step, StepData, Zone, ZoneInfo,
    };
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// セッション検証用のフェイクバックエンド
    struct FakeBackend {
        lookup: JobLookup,
        snapshots: Mutex<Vec<ProgressResponse>>,
        submitted: Mutex<Vec<MigrationRequest>>,
        fetch_count: AtomicUsize,
        zones: Vec<Zone>,
        projects: Vec<String>,
    }

    impl FakeBackend {
        fn new(lookup: JobLookup, mut snapshots: Vec<ProgressResponse>) -> Self {
            snapshots.reverse();
            Self {
                lookup,
                snapshots: Mutex::new(snapshots),
                submitted: Mutex::new(Vec::new()),
                fetch_count: AtomicUsize::new(0),
                zones: vec![ams_zone()],
                projects: vec!["demo".to_string()],
            }
        }

        fn submission_count(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MigrationBackend for FakeBackend {
        async fn lookup_job(&self, _region: &str) -> nimbus_api::Result<JobLookup> {
            Ok(self.lookup.clone())
        }

        async fn fetch_progress(&self, _region: &str) -> nimbus_api::Result<ProgressResponse> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.snapshots
                .lock()
                .unwrap()
                .pop()
                .ok_or(nimbus_api::ApiError::UnexpectedStatus(500))
        }

        async fn submit_migration(&self, request: &MigrationRequest) -> nimbus_api::Result<()> {
            self.submitted.lock().unwrap().push(request.clone());
            Ok(())
        }

        async fn get_zones(&self) -> nimbus_api::Result<Vec<Zone>> {
            Ok(self.zones.clone())
        }

        async fn project_list(&self) -> nimbus_api::Result<Vec<String>> {
            Ok(self.projects.clone())
        }
    }

    fn ams_zone() -> Zone {
        Zone {
            name: "ams1".to_string(),
            endpoint: "https://api.nimbus.dev/paas/v1/regions/ams1".to_string(),
            status: "UP".to_string(),
            release: "STABLE".to_string(),
            is_default: true,
            region_name: "ams".to_string(),
            region_city: "Amsterdam".to_string(),
            region_country: "NL".to_string(),
            created_at: None,
        }
    }

    fn config(region: &str) -> SessionConfig {
        SessionConfig {
            server: format!("https://api.nimbus.dev/paas/v1/regions/{}", region),
            region: region.to_string(),
            api_key: "Apikey test".to_string(),
            ..Default::default()
        }
    }

    fn snapshot(state: JobState) -> ProgressResponse {
        ProgressResponse {
            state,
            source: "fra1".to_string(),
            destination: "ams-ams1".to_string(),
            namespace: "demo".to_string(),
            steps: vec![],
        }
    }

    fn completed_snapshot() -> ProgressResponse {
        let zone_info = |ip: &str| ZoneInfo {
            services: vec![Service {
                name: "web".to_string(),
                ip: ip.to_string(),
            }],
            routes: vec![],
            gateway: format!("gw-{}", ip),
        };
        let mut progress = snapshot(JobState::Completed);
        progress.steps = vec![Step {
            order: 1,
            name: "finalize".to_string(),
            title: "Finalizing".to_string(),
            state: JobState::Completed,
            data: StepData {
                detail: None,
                source: Some(zone_info("1.2.3.4")),
                destination: Some(zone_info("5.6.7.8")),
            },
        }];
        progress
    }

    #[tokio::test]
    async fn test_active_job_never_resubmits() {
        // 実行中ジョブありの応答に対しては何度セッションを回しても
        // POSTは1件も出ない
        let backend = FakeBackend::new(
            JobLookup::Active,
            vec![snapshot(JobState::Running), completed_snapshot()],
        );
        let cfg = config("fra1");

        let mut input = Cursor::new("");
        let mut output = Vec::new();
        Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await
            .unwrap();

        assert_eq!(backend.submission_count(), 0);
        assert!(backend.fetch_count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_no_job_submits_composed_request() {
        let backend = FakeBackend::new(JobLookup::NoJob, vec![completed_snapshot()]);
        let cfg = config("fra1");

        // プロジェクトはデフォルト選択、ゾーンは1つで自動選択、
        // 確認ゲートにネームスペース名を入力
        let mut input = Cursor::new("\ndemo\n");
        let mut output = Vec::new();
        Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await
            .unwrap();

        let submitted = backend.submitted.lock().unwrap();
        assert_eq!(
            *submitted,
            vec![MigrationRequest {
                namespace: "demo".to_string(),
                source: "fra1".to_string(),
                destination: "ams-ams1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_terminal_job_redisplayed_and_decline_ends_cleanly() {
        let backend = FakeBackend::new(JobLookup::Existing(completed_snapshot()), vec![]);
        let cfg = config("fra1");

        let mut input = Cursor::new("n\n");
        let mut output = Vec::new();
        Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await
            .unwrap();

        // 前回結果が再表示され、ポーリングも投入も走らない
        let rendered = String::from_utf8_lossy(&output).to_string();
        assert!(rendered.contains("1.2.3.4"));
        assert_eq!(backend.submission_count(), 0);
        assert_eq!(backend.fetch_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_terminal_job_accept_restart_submits() {
        let backend = FakeBackend::new(
            JobLookup::Existing(completed_snapshot()),
            vec![completed_snapshot()],
        );
        let cfg = config("fra1");

        let mut input = Cursor::new("y\n\ndemo\n");
        let mut output = Vec::new();
        Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await
            .unwrap();

        assert_eq!(backend.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_frozen_region_rejected_before_builder() {
        let backend = FakeBackend::new(JobLookup::NoJob, vec![]);
        let cfg = config(request::FROZEN_REGION);

        let mut input = Cursor::new("");
        let mut output = Vec::new();
        let result = Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await;

        assert!(matches!(result, Err(MigrateError::FrozenRegion(_))));
        assert_eq!(backend.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_same_region_rejected() {
        // 設定リージョンが移行先ゾーンと同じ ams1
        let backend = FakeBackend::new(JobLookup::NoJob, vec![]);
        let cfg = config("ams1");

        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        let result = Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await;

        assert!(matches!(result, Err(MigrateError::SameRegion(_))));
        assert_eq!(backend.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_destination_by_name_skips_zone_prompt() {
        let backend = FakeBackend::new(JobLookup::NoJob, vec![completed_snapshot()]);
        let cfg = config("fra1");

        // ゾーン選択の入力は不要になる
        let mut input = Cursor::new("\ndemo\n");
        let mut output = Vec::new();
        Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .with_destination(Some("ams1".to_string()))
            .run(&mut input, &mut output)
            .await
            .unwrap();

        assert_eq!(backend.submission_count(), 1);
        let rendered = String::from_utf8_lossy(&output).to_string();
        assert!(!rendered.contains("Select region"));
    }

    #[tokio::test]
    async fn test_destination_by_name_not_found() {
        let backend = FakeBackend::new(JobLookup::NoJob, vec![]);
        let cfg = config("fra1");

        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        let result = Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .with_destination(Some("nowhere".to_string()))
            .run(&mut input, &mut output)
            .await;

        assert!(matches!(result, Err(MigrateError::RegionNotFound(_))));
        assert_eq!(backend.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_running_job_on_200_attaches() {
        let backend = FakeBackend::new(
            JobLookup::Existing(snapshot(JobState::Running)),
            vec![completed_snapshot()],
        );
        let cfg = config("fra1");

        let mut input = Cursor::new("");
        let mut output = Vec::new();
        Session::new(&backend, &cfg)
            .with_poll_interval(Duration::from_millis(1))
            .run(&mut input, &mut output)
            .await
            .unwrap();

        assert_eq!(backend.submission_count(), 0);
        assert_eq!(backend.fetch_count.load(Ordering::SeqCst), 1);
    }
}
