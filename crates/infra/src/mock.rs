//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todo-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicI32, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use todo_domain::todo::{NewTodo, Todo, TodoId, TodoUpdate};

use crate::{error::InfraError, repository::TodoRepository};

/// インメモリの TodoRepository
///
/// ID は 1 から採番し、削除後も再利用しない。
/// [`set_unavailable`](Self::set_unavailable) で DB 障害を再現できる。
#[derive(Clone)]
pub struct MockTodoRepository {
    todos:       Arc<Mutex<Vec<Todo>>>,
    next_id:     Arc<AtomicI32>,
    unavailable: Arc<AtomicBool>,
}

impl Default for MockTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self {
            todos:       Arc::new(Mutex::new(Vec::new())),
            next_id:     Arc::new(AtomicI32::new(1)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 以降の全操作を失敗させる（または復旧させる）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 保存されている行数
    pub fn len(&self) -> usize {
        self.todos.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ID で行を取得する（検証用）
    pub fn get(&self, id: TodoId) -> Option<Todo> {
        self.todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    fn check_available(&self) -> Result<(), InfraError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(InfraError::unexpected("mock: データベースに接続できません"));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        self.check_available()?;
        let mut todos = self.todos.lock().unwrap().clone();
        todos.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().as_i32().cmp(&a.id().as_i32()))
        });
        Ok(todos)
    }

    async fn insert(&self, new_todo: &NewTodo) -> Result<Todo, InfraError> {
        self.check_available()?;
        let id = TodoId::from_i32(self.next_id.fetch_add(1, Ordering::SeqCst));
        let todo = Todo::created(id, new_todo.clone());
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        id: TodoId,
        update: &TodoUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, InfraError> {
        self.check_available()?;
        let mut todos = self.todos.lock().unwrap();
        let Some(slot) = todos.iter_mut().find(|t| t.id() == id) else {
            return Ok(None);
        };
        let updated = slot.clone().apply(update, now);
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: TodoId) -> Result<bool, InfraError> {
        self.check_available()?;
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|t| t.id() != id);
        Ok(todos.len() < before)
    }
}
