use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

pub mod artists;
pub mod entities;
pub mod error;
pub mod forms;
pub mod genres;
pub mod shows;
pub mod venues;

pub use error::StoreError;
/// Re-export for convenience
pub use sea_orm;
pub use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/fyyurapp".to_string());

        Self {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            connect_timeout_secs: env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            idle_timeout_secs: env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Private in-memory SQLite database. A single pinned connection keeps
    /// the schema alive for as long as the pool lives.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 8,
            idle_timeout_secs: 3600,
        }
    }
}

/// Application state shared across handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

/// Connect to the database and return a connection pool
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(&config.url);
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    Database::connect(opt).await
}

/// `lower(column) LIKE %term%`, with LIKE wildcards in the term matched
/// literally.
///
/// The term is folded with Unicode rules to agree with Postgres `lower()`.
/// SQLite's `lower()` folds ASCII only, so on SQLite non-ASCII letters match
/// only when the stored name is already lowercase.
pub(crate) fn name_contains<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let escaped = term
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::venue;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    #[test]
    fn test_in_memory_config() {
        let config = DatabaseConfig::in_memory();
        assert_eq!(config.url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_name_contains_lowercases_both_sides() {
        let sql = venue::Entity::find()
            .filter(name_contains(venue::Column::Name, "Fillmore"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"LOWER("name") LIKE '%fillmore%'"#), "{sql}");
    }

    #[test]
    fn test_name_contains_folds_non_ascii_term() {
        let sql = venue::Entity::find()
            .filter(name_contains(venue::Column::Name, "CAFÉ"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("'%café%'"), "{sql}");
    }

    #[test]
    fn test_name_contains_escapes_wildcards() {
        let sql = venue::Entity::find()
            .filter(name_contains(venue::Column::Name, "100%_"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("100"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }
}
