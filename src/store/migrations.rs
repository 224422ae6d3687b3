//! Schema for the preference store.
//!
//! The applied schema version is the highest row in `_migrations`. Opening a
//! store applies each newer migration together with its version row in one
//! transaction.

use libsql::Connection;

use crate::error::StoreError;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Append only. Settings values are JSON text keyed by `(user_id, key)`.
static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "settings",
        sql: r#"
            CREATE TABLE IF NOT EXISTS settings (
                user_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (user_id, key)
            );
        "#,
    },
    Migration {
        version: 2,
        name: "settings_user_index",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_settings_user ON settings(user_id);
        "#,
    },
];

const VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Bring the preference schema up to the latest version.
pub async fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(VERSION_TABLE, ())
        .await
        .map_err(|e| StoreError::Migration(format!("version table: {e}")))?;

    let from = schema_version(conn).await?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > from).collect();
    if pending.is_empty() {
        tracing::debug!(version = from, "Preference schema up to date");
        return Ok(());
    }

    for m in pending {
        tracing::info!(version = m.version, name = m.name, "Upgrading preference schema");
        let batch = format!(
            "BEGIN;\n{}\nINSERT INTO _migrations (version, name) VALUES ({}, '{}');\nCOMMIT;",
            m.sql, m.version, m.name
        );
        if let Err(e) = conn.execute_batch(&batch).await {
            let _ = conn.execute("ROLLBACK", ()).await;
            return Err(StoreError::Migration(format!(
                "V{} ({}): {e}",
                m.version, m.name
            )));
        }
    }
    Ok(())
}

/// Highest applied version, 0 for a fresh database.
async fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM _migrations", ())
        .await
        .map_err(|e| StoreError::Migration(format!("schema version: {e}")))?;

    match rows
        .next()
        .await
        .map_err(|e| StoreError::Migration(format!("schema version: {e}")))?
    {
        Some(row) => row
            .get::<i64>(0)
            .map_err(|e| StoreError::Migration(format!("schema version: {e}"))),
        None => Ok(0),
    }
}
