//! Items table bootstrap
//!
//! Idempotent: creates the table on first start and is a no-op afterwards.
//! There are no versioned migrations.

use sqlx::PgPool;

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        description TEXT,
        price NUMERIC(10, 2) NOT NULL
    )
"#;

/// Create the `items` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("ensuring items table exists");
    sqlx::query(CREATE_ITEMS_TABLE).execute(pool).await?;
    Ok(())
}
