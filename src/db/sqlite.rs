use std::str::FromStr;

use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{PlayerStore, StoreError};
use crate::models::{Player, PlayerId, PlayerRow};

/// Players collection backed by an SQLite table.
#[derive(Debug, Clone)]
pub struct SqlitePlayerStore {
    pool: SqlitePool,
}

impl SqlitePlayerStore {
    /// Open a pool for `database_url`, creating the database file if needed,
    /// and make sure the players table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool. The players table is created if missing.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS players (
                   id TEXT PRIMARY KEY NOT NULL,
                   name TEXT NOT NULL,
                   region TEXT NOT NULL,
                   position TEXT NOT NULL
               )"#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl PlayerStore for SqlitePlayerStore {
    async fn insert_one(&self, player: &Player) -> Result<(), StoreError> {
        sqlx::query(r#"INSERT INTO players (id, name, region, position) VALUES (?, ?, ?, ?)"#)
            .bind(player.id.to_string())
            .bind(&player.name)
            .bind(&player.region)
            .bind(&player.position)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Duplicate(player.id)
                } else {
                    StoreError::Database(err)
                }
            })?;

        Ok(())
    }

    async fn find_one(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"SELECT id, name, region, position FROM players WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        // The row was matched by this id, so its id column is well formed.
        Ok(row.map(|row| Player {
            id,
            name: row.name,
            region: row.region,
            position: row.position,
        }))
    }

    async fn find_all(&self) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query(r#"SELECT id, name, region, position FROM players ORDER BY rowid"#)
            .fetch_all(&self.pool)
            .await?;

        let mut players = Vec::with_capacity(rows.len());
        for row in &rows {
            let decoded = PlayerRow::from_row(row)
                .map_err(|err| err.to_string())
                .and_then(|row| row.into_player().map_err(|err| err.to_string()));

            match decoded {
                Ok(player) => players.push(player),
                Err(err) => tracing::warn!(error = %err, "Skipping undecodable player record"),
            }
        }

        Ok(players)
    }

    async fn find_one_and_replace(&self, player: &Player) -> Result<Option<Player>, StoreError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"UPDATE players
               SET name = ?, region = ?, position = ?
               WHERE id = ?
               RETURNING id, name, region, position"#,
        )
        .bind(&player.name)
        .bind(&player.region)
        .bind(&player.position)
        .bind(player.id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Player {
            id: player.id,
            name: row.name,
            region: row.region,
            position: row.position,
        }))
    }

    async fn delete_one(&self, id: PlayerId) -> Result<u64, StoreError> {
        let result = sqlx::query(r#"DELETE FROM players WHERE id = ?"#)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn describe(&self) -> String {
        format!("sqlite ({} connections max)", self.pool.options().get_max_connections())
    }
}
