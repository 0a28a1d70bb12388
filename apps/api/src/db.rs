use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the about-me and history tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS about_me (
            id         INTEGER PRIMARY KEY CHECK (id = 1),
            content    TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS generation_history (
            id          UUID PRIMARY KEY,
            seq         BIGSERIAL NOT NULL,
            target_text TEXT NOT NULL,
            result_html TEXT NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created before `seq` existed.
    sqlx::query("ALTER TABLE generation_history ADD COLUMN IF NOT EXISTS seq BIGSERIAL")
        .execute(pool)
        .await?;

    info!("Database schema ready");
    Ok(())
}
