//! # Clock（時刻プロバイダ）
//!
//! タスクに記録される時刻の取得元。作成時の `created_at` と、完了にした
//! ときの `completed_at` はどちらもユースケースがこの時刻を読んで決め、
//! SQL にはパラメータとして渡す（DB 側の `CURRENT_TIMESTAMP` は使わない）。
//!
//! 本番は [`SystemClock`]、テストは [`FixedClock`] を注入する。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// システム時刻
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 常に同じ時刻を返す実装
///
/// HTTP テストで `created_at` / `completed_at` を文字列比較できるようにする。
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
