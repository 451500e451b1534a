//! # Todo Service サーバー
//!
//! タスク（todo）の一覧・作成・更新・削除を JSON API として提供する。
//!
//! ## 構成
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Frontend   │────▶│ Todo Service │────▶│  PostgreSQL  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                      handler → usecase → repository
//! ```
//!
//! 1 リクエストにつき 1 つの SQL 文を発行する。接続はプールから借り、
//! 文の完了とともに返却される。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env を読み込む）
//! cargo run -p todo-service
//!
//! # 本番環境
//! PORT=5000 DATABASE_URL=postgres://... LOG_FORMAT=json cargo run -p todo-service --release
//! ```
//!
//! 環境変数の一覧は [`todo_service::config`] を参照。

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use todo_domain::clock::SystemClock;
use todo_infra::{db, repository::PostgresTodoRepository};
use todo_service::{
    app_builder::build_app,
    config::TodoServiceConfig,
    handler::{ReadinessState, TodoState},
    usecase::TodoUseCaseImpl,
};
use todo_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Todo Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("todo-service"));

    // 設定読み込み
    let config = TodoServiceConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::debug!(?config, "設定を読み込みました");

    tracing::info!(
        "Todo Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let connect_options = config.database.connect_options()?;
    let pool = db::create_pool(connect_options, config.database.max_connections)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    // 依存コンポーネントを初期化
    let repository = Arc::new(PostgresTodoRepository::new(pool.clone()));
    let usecase = TodoUseCaseImpl::new(repository, Arc::new(SystemClock));
    let todo_state = Arc::new(TodoState { usecase });
    let readiness_state = Arc::new(ReadinessState { pool });

    let app = build_app(todo_state, readiness_state);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} にバインドできません"))?;
    tracing::info!("Todo Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
