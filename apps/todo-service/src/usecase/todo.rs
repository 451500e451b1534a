//! タスク管理ユースケース

use std::sync::Arc;

use todo_domain::{
    clock::Clock,
    todo::{NewTodo, Priority, Todo, TodoId, TodoTask, TodoUpdate},
};
use todo_infra::repository::TodoRepository;

use crate::error::CoreError;

/// 該当タスクがないときのメッセージ
pub const TODO_NOT_FOUND_MESSAGE: &str = "todo not found.";

/// タスク作成の入力
///
/// `task` の必須チェックはユースケースで行うため、両方とも省略可能な形で受け取る。
pub struct CreateTodoInput {
    pub task:     Option<String>,
    pub priority: Option<String>,
}

/// タスク管理ユースケース
pub struct TodoUseCaseImpl {
    repository: Arc<dyn TodoRepository>,
    clock:      Arc<dyn Clock>,
}

impl TodoUseCaseImpl {
    pub fn new(repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 全タスクを新しい順に取得する
    #[tracing::instrument(skip_all)]
    pub async fn list_todos(&self) -> Result<Vec<Todo>, CoreError> {
        Ok(self.repository.find_all().await?)
    }

    /// タスクを作成する
    ///
    /// 1. `task` が空でないことを検証（空なら DB に触れない）
    /// 2. `priority` 未指定・空なら `"media"`
    /// 3. 現在時刻を `created_at` として挿入
    #[tracing::instrument(skip_all)]
    pub async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, CoreError> {
        let task = TodoTask::new(input.task.unwrap_or_default())?;
        let priority = Priority::from_optional(input.priority);
        let new_todo = NewTodo::new(task, priority, self.clock.now());

        let todo = self.repository.insert(&new_todo).await?;
        tracing::info!(id = %todo.id(), "タスクを作成しました");
        Ok(todo)
    }

    /// タスクを更新する
    ///
    /// 完了状態の切り替えでは、この時点の時刻が `completed_at` になる。
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn update_todo(&self, id: TodoId, update: TodoUpdate) -> Result<Todo, CoreError> {
        self.repository
            .update(id, &update, self.clock.now())
            .await?
            .ok_or_else(|| CoreError::NotFound(TODO_NOT_FOUND_MESSAGE.to_string()))
    }

    /// タスクを削除する
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), CoreError> {
        if !self.repository.delete(id).await? {
            return Err(CoreError::NotFound(TODO_NOT_FOUND_MESSAGE.to_string()));
        }
        tracing::info!("タスクを削除しました");
        Ok(())
    }
}
