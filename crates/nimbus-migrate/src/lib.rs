//! クロスリージョン・マイグレーションのオーケストレーションクライアント
//!
//! サーバー側で実行される長時間ジョブを、状態を持たないCLI起動から
//! 完了まで追跡する。構成要素:
//!
//! - [`zone`] — ゾーンカタログの取得と稼働中/停止中の分割・選択
//! - [`request`] — 不変リクエストの組み立てと確認ゲート
//! - [`session`] — サーバー状態と突き合わせる再入可能な状態機械
//! - [`poll`] — 固定間隔ポーリングと終端判定
//! - [`report`] — 移行前後の差分レポート（純粋関数）

pub mod error;
pub mod poll;
pub mod prompt;
pub mod render;
pub mod report;
pub mod request;
pub mod session;
pub mod zone;

pub use error::{MigrateError, Result};
pub use session::Session;
