//! # TodoRepository
//!
//! タスクの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **1 操作 = 1 SQL 文**: トランザクションは使わず、単文の原子性に委ねる
//! - **RETURNING**: 挿入・更新後の行を同じ文で取得する
//! - **全値をバインド**: `completed_at` の時刻も含め、SQL 文字列への埋め込みはしない
//!
//! 対象テーブルは `migrations/` の `todos`。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use todo_domain::todo::{NewTodo, Priority, Todo, TodoId, TodoTask, TodoUpdate};

use crate::error::InfraError;

/// タスクリポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 全タスクを作成日時の降順で取得する
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError>;

    /// タスクを挿入し、採番された ID を含む行を返す
    async fn insert(&self, new_todo: &NewTodo) -> Result<Todo, InfraError>;

    /// 更新を適用し、更新後の行を返す
    ///
    /// 該当 ID の行がなければ `None`。
    async fn update(
        &self,
        id: TodoId,
        update: &TodoUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, InfraError>;

    /// タスクを削除する
    ///
    /// 行を削除した場合は `true`、該当 ID がなければ `false`。
    async fn delete(&self, id: TodoId) -> Result<bool, InfraError>;
}

/// `todos` テーブルの 1 行
#[derive(Debug, FromRow)]
struct TodoRow {
    id:           i32,
    task:         String,
    priority:     String,
    completed:    bool,
    completed_at: Option<DateTime<Utc>>,
    archived:     bool,
    created_at:   DateTime<Utc>,
}

// 入力検証は作成・編集の経路で済んでいる。既存の行（空の task を含む）は
// そのまま返し、1 行のために一覧全体を失敗させない。
impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo::from_db(
            TodoId::from_i32(row.id),
            TodoTask::from_db(row.task),
            Priority::new(row.priority),
            row.completed,
            row.completed_at,
            row.archived,
            row.created_at,
        )
    }
}

/// 取得列（全クエリ共通）
const TODO_COLUMNS: &str = "id, task, priority, completed, completed_at, archived, created_at";

/// PostgreSQL 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        let sql = format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_todo: &NewTodo) -> Result<Todo, InfraError> {
        let sql = format!(
            r#"
            INSERT INTO todos (task, priority, completed, archived, created_at)
            VALUES ($1, $2, false, false, $3)
            RETURNING {TODO_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(new_todo.task.as_str())
            .bind(new_todo.priority.as_str())
            .bind(new_todo.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(Todo::from(row))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %id))]
    async fn update(
        &self,
        id: TodoId,
        update: &TodoUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, InfraError> {
        let row = match update {
            TodoUpdate::Complete { completed } => {
                let sql = format!(
                    r#"
                    UPDATE todos SET completed = $1, completed_at = $2
                    WHERE id = $3
                    RETURNING {TODO_COLUMNS}
                    "#
                );
                sqlx::query_as::<_, TodoRow>(&sql)
                    .bind(*completed)
                    .bind(TodoUpdate::completed_at(*completed, now))
                    .bind(id.as_i32())
                    .fetch_optional(&self.pool)
                    .await?
            }
            TodoUpdate::Archive { archived } => {
                let sql = format!(
                    r#"
                    UPDATE todos SET archived = $1
                    WHERE id = $2
                    RETURNING {TODO_COLUMNS}
                    "#
                );
                sqlx::query_as::<_, TodoRow>(&sql)
                    .bind(*archived)
                    .bind(id.as_i32())
                    .fetch_optional(&self.pool)
                    .await?
            }
            TodoUpdate::Edit { task, priority } => {
                let sql = format!(
                    r#"
                    UPDATE todos SET task = $1, priority = $2
                    WHERE id = $3
                    RETURNING {TODO_COLUMNS}
                    "#
                );
                sqlx::query_as::<_, TodoRow>(&sql)
                    .bind(task.as_str())
                    .bind(priority.as_str())
                    .bind(id.as_i32())
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(row.map(Todo::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %id))]
    async fn delete(&self, id: TodoId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
