//! # PostgreSQL データベース接続管理
//!
//! データベース接続プールの作成、マイグレーション、疎通確認を行う。
//!
//! ## 接続プール
//!
//! プールは起動時に一度だけ作成し、全ハンドラで共有する（`PgPool` は
//! 内部で `Arc` を持つため clone は安価）。クエリごとにプールから接続を借り、
//! 成功・失敗いずれの経路でもドロップ時にプールへ返却される。
//! 同時実行数は `max_connections` で上限が決まる。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use sqlx::postgres::PgConnectOptions;
//! use todo_infra::db;
//!
//! let options: PgConnectOptions = "postgres://postgres@localhost/todos".parse()?;
//! let pool = db::create_pool(options, 10).await?;
//! db::run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::error::InfraError;

/// 接続取得のタイムアウト
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL 接続プールを作成する
///
/// 起動時に 1 本接続を確立して疎通を確認する。失敗時は `InfraError` を返す。
pub async fn create_pool(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, InfraError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` マクロで埋め込まれたマイグレーションファイルを
/// 順番に適用する。適用済みのマイグレーションはスキップされる。
/// sqlx が advisory lock を使用するため、複数プロセスから同時に呼び出しても安全。
pub async fn run_migrations(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// データベースへの疎通を確認する
///
/// readiness チェックで使用する。
#[tracing::instrument(skip_all, level = "debug")]
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
