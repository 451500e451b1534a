//! # タスク（Todo）
//!
//! サービスが扱う唯一のエンティティ。
//!
//! ## 状態
//!
//! 状態機械は持たない。`completed` と `archived` の 2 つのフラグと、
//! `task` / `priority` の内容だけが変化する。1 回の更新で変わるのは
//! [`TodoUpdate`] のいずれか 1 種類に限られる。
//!
//! ## 不変条件
//!
//! - `completed_at` は `completed` が true のときだけ値を持つ
//! - `created_at` は作成後に変化しない
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::DateTime;
//! use todo_domain::todo::{Priority, Todo, TodoId, TodoTask, TodoUpdate};
//!
//! let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
//! let todo = Todo::from_db(
//!     TodoId::from_i32(1),
//!     TodoTask::new("Buy milk").unwrap(),
//!     Priority::default(),
//!     false,
//!     None,
//!     false,
//!     created_at,
//! );
//!
//! let now = DateTime::from_timestamp(1_700_000_100, 0).unwrap();
//! let done = todo.apply(&TodoUpdate::Complete { completed: true }, now);
//! assert!(done.completed());
//! assert_eq!(done.completed_at(), Some(now));
//! ```

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// `task` が欠落・空のときのメッセージ
pub const TASK_REQUIRED_MESSAGE: &str = "task field is required.";

/// リクエストボディを解釈できない、または更新種別を決められないときのメッセージ
pub const INVALID_BODY_MESSAGE: &str = "invalid request body.";

// =========================================================================
// TodoId
// =========================================================================

/// タスクの識別子
///
/// DB の `SERIAL` 列で採番される。再利用されない。
/// パスパラメータとしてそのままデシリアライズできる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct TodoId(i32);

impl TodoId {
    pub fn from_i32(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

// =========================================================================
// TodoTask（タスク本文）
// =========================================================================

/// タスク本文（値オブジェクト）
///
/// # 不変条件
///
/// - 入力（作成・編集）から作る場合、空白のみの文字列ではない
///
/// 保存済みの行は入力検証の導入前に書かれたものを含むため、
/// [`TodoTask::from_db`] では検証しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTask(String);

impl TodoTask {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation(TASK_REQUIRED_MESSAGE.to_string()));
        }
        Ok(Self(value))
    }

    /// データベースの値から復元する（検証しない）
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TodoTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// Priority（優先度）
// =========================================================================

/// 優先度ラベル（値オブジェクト）
///
/// ラベルは開いた集合で、`alta` / `media` / `baja` 以外も受け付ける。
/// 未指定または空文字列の場合は [`Priority::MEDIUM`] になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Priority(String);

impl Priority {
    pub const HIGH: &'static str = "alta";
    pub const MEDIUM: &'static str = "media";
    pub const LOW: &'static str = "baja";

    /// 任意のラベルから優先度を作る。空文字列はデフォルトに倒す。
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return Self::default();
        }
        Self(value)
    }

    /// 省略可能な入力から優先度を作る
    pub fn from_optional(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(Self::MEDIUM.to_string())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// TodoUpdate（更新種別）
// =========================================================================

/// 1 回の更新リクエストで適用される変更
///
/// 3 種類は排他で、同じリクエストで組み合わせることはできない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoUpdate {
    /// 完了状態の切り替え。`completed_at` も同時に決まる
    Complete { completed: bool },
    /// アーカイブ状態の切り替え
    Archive { archived: bool },
    /// 本文と優先度の上書き
    Edit { task: TodoTask, priority: Priority },
}

impl TodoUpdate {
    /// リクエストに含まれていたフィールドから更新種別を決定する
    ///
    /// 判定の優先順位:
    ///
    /// 1. `completed` があれば [`TodoUpdate::Complete`]
    /// 2. `archived` があれば [`TodoUpdate::Archive`]
    /// 3. `task` と `priority` の両方があれば [`TodoUpdate::Edit`]
    /// 4. それ以外は [`INVALID_BODY_MESSAGE`] のバリデーションエラー
    ///
    /// 優先度の高いフィールドがあれば、残りのフィールドは無視される。
    pub fn from_fields(
        completed: Option<bool>,
        archived: Option<bool>,
        task: Option<String>,
        priority: Option<String>,
    ) -> Result<Self, DomainError> {
        if let Some(completed) = completed {
            return Ok(Self::Complete { completed });
        }
        if let Some(archived) = archived {
            return Ok(Self::Archive { archived });
        }
        match (task, priority) {
            (Some(task), Some(priority)) => Ok(Self::Edit {
                task:     TodoTask::new(task)?,
                priority: Priority::new(priority),
            }),
            _ => Err(DomainError::Validation(INVALID_BODY_MESSAGE.to_string())),
        }
    }

    /// `Complete` の場合に設定すべき `completed_at` を返す
    ///
    /// 完了にするなら `now`、未完了に戻すなら `None`。
    pub fn completed_at(completed: bool, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        completed.then_some(now)
    }
}

// =========================================================================
// NewTodo / Todo
// =========================================================================

/// 挿入前のタスク
///
/// `id` は DB が採番するため持たない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub task:       TodoTask,
    pub priority:   Priority,
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    pub fn new(task: TodoTask, priority: Priority, created_at: DateTime<Utc>) -> Self {
        Self {
            task,
            priority,
            created_at,
        }
    }
}

/// タスクエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:           TodoId,
    task:         TodoTask,
    priority:     Priority,
    completed:    bool,
    completed_at: Option<DateTime<Utc>>,
    archived:     bool,
    created_at:   DateTime<Utc>,
}

impl Todo {
    /// 採番済みの ID で新規タスクを確定させる
    pub fn created(id: TodoId, new_todo: NewTodo) -> Self {
        Self {
            id,
            task: new_todo.task,
            priority: new_todo.priority,
            completed: false,
            completed_at: None,
            archived: false,
            created_at: new_todo.created_at,
        }
    }

    /// データベースからタスクを復元する
    pub fn from_db(
        id: TodoId,
        task: TodoTask,
        priority: Priority,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
        archived: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task,
            priority,
            completed,
            completed_at,
            archived,
            created_at,
        }
    }

    /// 更新を適用した新しい状態を返す
    ///
    /// `created_at` と `id` は変化しない。
    pub fn apply(self, update: &TodoUpdate, now: DateTime<Utc>) -> Self {
        match update {
            TodoUpdate::Complete { completed } => Self {
                completed: *completed,
                completed_at: TodoUpdate::completed_at(*completed, now),
                ..self
            },
            TodoUpdate::Archive { archived } => Self {
                archived: *archived,
                ..self
            },
            TodoUpdate::Edit { task, priority } => Self {
                task: task.clone(),
                priority: priority.clone(),
                ..self
            },
        }
    }

    // Getter メソッド

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn task(&self) -> &TodoTask {
        &self.task
    }

    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn archived(&self) -> bool {
        self.archived
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn created_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_600, 0).unwrap()
    }

    #[fixture]
    fn todo(created_at: DateTime<Utc>) -> Todo {
        Todo::created(
            TodoId::from_i32(1),
            NewTodo::new(
                TodoTask::new("Buy milk").unwrap(),
                Priority::default(),
                created_at,
            ),
        )
    }

    // ===== TodoTask =====

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_空のタスク本文はバリデーションエラー(#[case] input: &str) {
        let result = TodoTask::new(input);

        assert_eq!(
            result,
            Err(DomainError::Validation(TASK_REQUIRED_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_タスク本文は入力そのままを保持する() {
        let task = TodoTask::new(" Buy milk ").unwrap();

        assert_eq!(task.as_str(), " Buy milk ");
    }

    #[test]
    fn test_保存済みの空のタスク本文はそのまま復元できる() {
        let task = TodoTask::from_db(String::new());

        assert_eq!(task.as_str(), "");
    }

    // ===== Priority =====

    #[rstest]
    #[case(None, "media")]
    #[case(Some(""), "media")]
    #[case(Some("alta"), "alta")]
    #[case(Some("urgente"), "urgente")]
    fn test_優先度は未指定と空文字列でmediaになる(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) {
        let priority = Priority::from_optional(input.map(str::to_string));

        assert_eq!(priority.as_str(), expected);
    }

    // ===== TodoUpdate::from_fields =====

    #[test]
    fn test_completedがあれば他のフィールドより優先される() {
        let update = TodoUpdate::from_fields(
            Some(false),
            Some(true),
            Some("x".to_string()),
            Some("alta".to_string()),
        )
        .unwrap();

        assert_eq!(update, TodoUpdate::Complete { completed: false });
    }

    #[test]
    fn test_archivedはtaskとpriorityより優先される() {
        let update = TodoUpdate::from_fields(
            None,
            Some(true),
            Some("x".to_string()),
            Some("alta".to_string()),
        )
        .unwrap();

        assert_eq!(update, TodoUpdate::Archive { archived: true });
    }

    #[test]
    fn test_taskとpriorityの両方があれば編集になる() {
        let update =
            TodoUpdate::from_fields(None, None, Some("Call mom".to_string()), Some("baja".to_string()))
                .unwrap();

        assert_eq!(
            update,
            TodoUpdate::Edit {
                task:     TodoTask::new("Call mom").unwrap(),
                priority: Priority::new("baja"),
            }
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("Call mom"), None)]
    #[case(None, Some("alta"))]
    fn test_どの形にも当てはまらない更新は不正なボディ(
        #[case] task: Option<&str>,
        #[case] priority: Option<&str>,
    ) {
        let result = TodoUpdate::from_fields(
            None,
            None,
            task.map(str::to_string),
            priority.map(str::to_string),
        );

        assert_eq!(
            result,
            Err(DomainError::Validation(INVALID_BODY_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_編集で空のタスク本文はバリデーションエラー() {
        let result =
            TodoUpdate::from_fields(None, None, Some(String::new()), Some("alta".to_string()));

        assert_eq!(
            result,
            Err(DomainError::Validation(TASK_REQUIRED_MESSAGE.to_string()))
        );
    }

    // ===== Todo::apply =====

    #[rstest]
    fn test_新規タスクは未完了かつ未アーカイブ(todo: Todo, created_at: DateTime<Utc>) {
        assert!(!todo.completed());
        assert!(!todo.archived());
        assert_eq!(todo.completed_at(), None);
        assert_eq!(todo.created_at(), created_at);
        assert_eq!(todo.priority().as_str(), "media");
    }

    #[rstest]
    fn test_完了にするとcompleted_atが設定され戻すとクリアされる(
        todo: Todo,
        now: DateTime<Utc>,
    ) {
        let done = todo.apply(&TodoUpdate::Complete { completed: true }, now);
        assert!(done.completed());
        assert_eq!(done.completed_at(), Some(now));

        let undone = done.apply(&TodoUpdate::Complete { completed: false }, now);
        assert!(!undone.completed());
        assert_eq!(undone.completed_at(), None);
    }

    #[rstest]
    fn test_アーカイブは冪等(todo: Todo, now: DateTime<Utc>) {
        let update = TodoUpdate::Archive { archived: true };

        let once = todo.apply(&update, now);
        let twice = once.clone().apply(&update, now);

        assert_eq!(once, twice);
        assert!(twice.archived());
    }

    #[rstest]
    fn test_編集はcreated_atとidを変えない(
        todo: Todo,
        now: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) {
        let update = TodoUpdate::Edit {
            task:     TodoTask::new("Buy bread").unwrap(),
            priority: Priority::new("alta"),
        };

        let edited = todo.apply(&update, now);

        assert_eq!(edited.id(), TodoId::from_i32(1));
        assert_eq!(edited.task().as_str(), "Buy bread");
        assert_eq!(edited.priority().as_str(), "alta");
        assert_eq!(edited.created_at(), created_at);
        assert!(!edited.completed());
    }
}
