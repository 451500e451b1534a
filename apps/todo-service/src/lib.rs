//! # Todo Service ライブラリ
//!
//! Todo Service のユースケースとハンドラを公開する。
//! 統合テストからルーターを組み立てられるよう、`main.rs` と分離している。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
