use chrono::Utc;
use tokio_postgres::{Client, NoTls};

use std::time::Duration;

use crate::{config::Config, error::StartupError, models::Note};

pub const SEED_TEXT: &str = "Hello from simple app";

const CREATE_NOTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS notes (
    id BIGSERIAL PRIMARY KEY,
    text TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Opens one short-lived connection per operation.
///
/// Nothing is pooled: each method connects, runs its statements and drops the
/// client, which ends the background connection task.
#[derive(Clone)]
pub struct Database {
    pg_config: tokio_postgres::Config,
}

impl Database {
    pub fn new(config: &Config) -> Self {
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.db_host)
            .port(config.db_port)
            .dbname(&config.db_name)
            .user(&config.db_user)
            .password(&config.db_password)
            .connect_timeout(config.connect_timeout());

        Self { pg_config }
    }

    async fn connect(&self) -> Result<Client, tokio_postgres::Error> {
        let (client, con) = self.pg_config.connect(NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(client)
    }

    async fn ping(&self) -> Result<(), tokio_postgres::Error> {
        let client = self.connect().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    /// Polls the database until it answers, giving up after `max_retries` attempts.
    pub async fn wait_for_database(
        &self,
        max_retries: u32,
        delay: Duration,
    ) -> Result<(), StartupError> {
        for attempt in 1..=max_retries {
            match self.ping().await {
                Ok(()) => {
                    tracing::info!("DB is ready");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("DB not ready ({}/{}): {}", attempt, max_retries, e);
                    if attempt < max_retries {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(StartupError::DatabaseUnreachable {
            attempts: max_retries,
        })
    }

    /// Creates the notes table if needed and seeds it when empty.
    ///
    /// Returns `true` when the seed row was inserted by this call.
    pub async fn init_schema(&self) -> Result<bool, tokio_postgres::Error> {
        let mut client = self.connect().await?;
        let tx = client.transaction().await?;

        tx.batch_execute(CREATE_NOTES_TABLE).await?;

        let count: i64 = tx.query_one("SELECT COUNT(*) FROM notes", &[]).await?.get(0);
        let seeded = count == 0;
        if seeded {
            tx.execute(
                "INSERT INTO notes (text, created_at) VALUES ($1, $2)",
                &[&SEED_TEXT, &Utc::now()],
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!("DB schema ready (seeded: {})", seeded);

        Ok(seeded)
    }

    pub async fn create_note(&self, text: &str) -> Result<Note, tokio_postgres::Error> {
        let client = self.connect().await?;
        let row = client
            .query_one(
                "INSERT INTO notes (text) VALUES ($1) RETURNING id, text, created_at",
                &[&text],
            )
            .await?;

        Note::try_from(row)
    }

    pub async fn update_note(
        &self,
        id: i64,
        text: &str,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        let client = self.connect().await?;
        let row = client
            .query_opt(
                "UPDATE notes SET text = $1 WHERE id = $2 RETURNING id, text, created_at",
                &[&text, &id],
            )
            .await?;

        row.map(Note::try_from).transpose()
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, tokio_postgres::Error> {
        let client = self.connect().await?;
        let row = client
            .query_opt("DELETE FROM notes WHERE id = $1 RETURNING id", &[&id])
            .await?;

        Ok(row.is_some())
    }

    pub async fn get_latest_note(&self) -> Result<Option<Note>, tokio_postgres::Error> {
        let client = self.connect().await?;
        let row = client
            .query_opt(
                "SELECT id, text, created_at FROM notes ORDER BY id DESC LIMIT 1",
                &[],
            )
            .await?;

        row.map(Note::try_from).transpose()
    }

    pub async fn get_all_notes(&self) -> Result<Vec<Note>, tokio_postgres::Error> {
        let client = self.connect().await?;
        let rows = client
            .query("SELECT id, text, created_at FROM notes ORDER BY id DESC", &[])
            .await?;

        rows.into_iter().map(Note::try_from).collect()
    }

    /// Points a fresh database handle at an empty schema of its own, so tests
    /// that need exact row counts do not see rows written by other tests.
    #[cfg(test)]
    pub async fn isolated(config: &Config, schema: &str) -> Result<Self, tokio_postgres::Error> {
        let base = Self::new(config);
        base.connect()
            .await?
            .batch_execute(&format!(
                "DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema}"
            ))
            .await?;

        let mut pg_config = base.pg_config;
        pg_config.options(&format!("-c search_path={schema}"));
        Ok(Self { pg_config })
    }

    #[cfg(test)]
    pub async fn execute_raw(&self, sql: &str) -> Result<(), tokio_postgres::Error> {
        self.connect().await?.batch_execute(sql).await
    }

    #[cfg(test)]
    pub async fn count_notes(&self) -> Result<i64, tokio_postgres::Error> {
        let client = self.connect().await?;
        let row = client.query_one("SELECT COUNT(*) FROM notes", &[]).await?;

        Ok(row.get(0))
    }
}
