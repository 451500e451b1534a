//! # Todo Service 設定
//!
//! 環境変数から Todo Service サーバーの設定を読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `TODO_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `5000` | ポート番号 |
//! | `DATABASE_URL` | No | - | PostgreSQL 接続 URL（指定時は `DB_*` より優先） |
//! | `DB_HOST` | No | `localhost` | DB ホスト |
//! | `DB_PORT` | No | `5432` | DB ポート |
//! | `DB_USER` | No | `postgres` | DB ユーザー |
//! | `DB_PASSWORD` | No | 空 | DB パスワード |
//! | `DB_NAME` | No | `todos` | データベース名 |
//! | `DB_MAX_CONNECTIONS` | No | `10` | 接続プールの最大接続数 |

use std::{collections::HashMap, env, str::FromStr};

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 数値として解釈できない値
    #[error("{name} は有効な数値である必要があります: {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    /// `DATABASE_URL` が PostgreSQL の URL として解釈できない
    #[error("DATABASE_URL が不正です: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),
}

/// データベース接続設定
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url:             Option<String>,
    pub host:            String,
    pub port:            u16,
    pub user:            String,
    pub password:        String,
    pub name:            String,
    pub max_connections: u32,
}

// パスワードと URL（パスワードを含みうる）はログに出さない
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

impl DatabaseConfig {
    /// sqlx の接続オプションを組み立てる
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(ConfigError::InvalidDatabaseUrl);
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

/// Todo Service サーバーの設定
#[derive(Debug, Clone)]
pub struct TodoServiceConfig {
    /// バインドアドレス
    pub host:     String,
    /// ポート番号
    pub port:     u16,
    /// データベース接続設定
    pub database: DatabaseConfig,
}

impl TodoServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// 変数表から設定を読み込む
    ///
    /// 値の取得元を差し替えられるよう `from_env` から分離している。
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| -> String {
            vars.get(name)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            host:     get("TODO_HOST", "0.0.0.0"),
            port:     parse_number("PORT", get("PORT", "5000"))?,
            database: DatabaseConfig {
                url:             vars.get("DATABASE_URL").cloned(),
                host:            get("DB_HOST", "localhost"),
                port:            parse_number("DB_PORT", get("DB_PORT", "5432"))?,
                user:            get("DB_USER", "postgres"),
                password:        get("DB_PASSWORD", ""),
                name:            get("DB_NAME", "todos"),
                max_connections: parse_number(
                    "DB_MAX_CONNECTIONS",
                    get("DB_MAX_CONNECTIONS", "10"),
                )?,
            },
        })
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_未設定の場合はデフォルト値を使う() {
        let config = TodoServiceConfig::from_vars(&HashMap::new()).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.name, "todos");
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_db変数から接続オプションを組み立てる() {
        let config = TodoServiceConfig::from_vars(&vars(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "todo"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "todo_db"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        let options = config.database.connect_options().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "todo");
        assert_eq!(options.get_database(), Some("todo_db"));
    }

    #[test]
    fn test_database_urlはdb変数より優先される() {
        let config = TodoServiceConfig::from_vars(&vars(&[
            ("DATABASE_URL", "postgres://app@pg.internal:5433/app_db"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();

        let options = config.database.connect_options().unwrap();

        assert_eq!(options.get_host(), "pg.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("app_db"));
    }

    #[test]
    fn test_不正なポート番号はエラー() {
        let result = TodoServiceConfig::from_vars(&vars(&[("PORT", "abc")]));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_debug出力にパスワードを含めない() {
        let config = TodoServiceConfig::from_vars(&vars(&[("DB_PASSWORD", "secret")])).unwrap();

        assert!(!format!("{config:?}").contains("secret"));
    }
}
