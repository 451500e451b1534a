//! # エラーレスポンス
//!
//! API が返すエラーボディと、削除などの確認メッセージを提供する。
//!
//! ## 形式
//!
//! エラーはすべて `{"error": "..."}` の 1 フィールドで返す。
//! ステータスコードは HTTP レスポンス側で表現し、ボディには含めない。
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - よく使うメッセージは便利コンストラクタで提供する

use serde::{Deserialize, Serialize};

/// 500 のときにクライアントへ返す固定メッセージ
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub error: String,
}

impl ErrorResponse {
   pub fn new(error: impl Into<String>) -> Self {
      Self {
         error: error.into(),
      }
   }

   /// 500 Internal Server Error
   ///
   /// メッセージは固定値（内部情報を漏らさないため）。
   pub fn internal_error() -> Self {
      Self::new(INTERNAL_ERROR_MESSAGE)
   }
}

/// 確認メッセージのみのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
   pub message: String,
}

impl MessageResponse {
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message: message.into(),
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_jsonシリアライズでerrorフィールドのみを持つ() {
      let error = ErrorResponse::new("task field is required.");
      let json = serde_json::to_value(&error).unwrap();

      assert_eq!(json, serde_json::json!({ "error": "task field is required." }));
   }

   #[test]
   fn test_internal_error_は固定メッセージを返す() {
      assert_eq!(ErrorResponse::internal_error().error, "Internal Server Error");
   }

   #[test]
   fn test_jsonデシリアライズが正しく動作する() {
      let error: ErrorResponse = serde_json::from_str(r#"{"error": "todo not found."}"#).unwrap();

      assert_eq!(error, ErrorResponse::new("todo not found."));
   }

   #[test]
   fn test_message_responseはmessageフィールドを持つ() {
      let json = serde_json::to_value(MessageResponse::new("todo deleted.")).unwrap();

      assert_eq!(json, serde_json::json!({ "message": "todo deleted." }));
   }
}
