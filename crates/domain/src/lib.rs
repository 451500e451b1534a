//! # Todo ドメイン層
//!
//! タスク（todo）を表現するドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`todo`] - タスクエンティティと値オブジェクト
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::todo::{Priority, TodoUpdate};
//!
//! let update = TodoUpdate::from_fields(Some(true), None, None, None).unwrap();
//! assert_eq!(update, TodoUpdate::Complete { completed: true });
//! assert_eq!(Priority::default().as_str(), "media");
//! ```

pub mod clock;
pub mod error;
pub mod todo;

pub use error::DomainError;
