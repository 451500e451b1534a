//! # ドメイン層エラー定義
//!
//! 入力値がタスクのルールに違反した場合のエラー型。
//! API 層でこのエラーを受け取り、400 Bad Request に変換する。
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::DomainError;
//!
//! fn validate_task(task: &str) -> Result<(), DomainError> {
//!     if task.is_empty() {
//!         return Err(DomainError::Validation("task field is required.".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_task("").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// メッセージはそのままクライアントに返される。
    #[error("{0}")]
    Validation(String),
}
