use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, warn};

use shared::{domain::Follower, error::FavoritesError};

/// Persistent set of favorited followers.
///
/// Duplicate detection uses full follower equality (login and avatar URL).
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn add(&self, follower: &Follower) -> Result<(), FavoritesError>;
    async fn remove(&self, follower: &Follower) -> Result<(), FavoritesError>;
    async fn list(&self) -> Result<Vec<Follower>, FavoritesError>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredFavorite {
    pub follower: Follower,
    pub added_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        create_database_dir(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = pool_options(database_url)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run favorites migrations")?;
        debug!(%database_url, "favorites store ready");
        Ok(Self { pool })
    }

    pub async fn list_with_timestamps(&self) -> Result<Vec<StoredFavorite>, FavoritesError> {
        let rows = sqlx::query(
            "SELECT login, avatar_url, added_at FROM favorites ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_error)?;

        rows.into_iter()
            .map(|r| {
                Ok(StoredFavorite {
                    follower: Follower::new(
                        r.try_get::<String, _>(0).map_err(persistence_error)?,
                        r.try_get::<String, _>(1).map_err(persistence_error)?,
                    ),
                    added_at: r
                        .try_get::<DateTime<Utc>, _>(2)
                        .map_err(persistence_error)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl FavoritesStore for Storage {
    async fn add(&self, follower: &Follower) -> Result<(), FavoritesError> {
        let result = sqlx::query("INSERT INTO favorites (login, avatar_url) VALUES (?, ?)")
            .bind(&follower.login)
            .bind(&follower.avatar_url)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!(login = %follower.login, "favorite stored");
                Ok(())
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(FavoritesError::Duplicate)
            }
            Err(err) => Err(persistence_error(err)),
        }
    }

    async fn remove(&self, follower: &Follower) -> Result<(), FavoritesError> {
        let result = sqlx::query("DELETE FROM favorites WHERE login = ? AND avatar_url = ?")
            .bind(&follower.login)
            .bind(&follower.avatar_url)
            .execute(&self.pool)
            .await
            .map_err(persistence_error)?;

        if result.rows_affected() == 0 {
            return Err(FavoritesError::NotFound);
        }
        debug!(login = %follower.login, "favorite removed");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Follower>, FavoritesError> {
        Ok(self
            .list_with_timestamps()
            .await?
            .into_iter()
            .map(|stored| stored.follower)
            .collect())
    }
}

fn persistence_error(err: sqlx::Error) -> FavoritesError {
    warn!("favorites store failure: {err}");
    FavoritesError::Persistence(err.to_string())
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

// An in-memory database lives and dies with its one connection, so that
// connection must never be reaped.
fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if is_memory_url(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

/// File backing a sqlite url, if any.
fn database_file(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) {
        return None;
    }
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);
    (!path.is_empty()).then(|| PathBuf::from(path))
}

fn create_database_dir(database_url: &str) -> Result<()> {
    let Some(dir) = database_file(database_url)
        .and_then(|file| file.parent().map(Path::to_path_buf))
        .filter(|dir| !dir.as_os_str().is_empty())
    else {
        return Ok(());
    };

    fs::create_dir_all(&dir).with_context(|| {
        format!(
            "failed to create directory '{}' for favorites database",
            dir.display()
        )
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
