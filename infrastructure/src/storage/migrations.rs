//! Schema migrations, tracked through `PRAGMA user_version`.
//!
//! Every step is idempotent (`IF NOT EXISTS`), so replaying one on a
//! partially migrated database is harmless.

use rusqlite::Connection;

use super::to_store_err;
use survey_sim_application::StoreError;

const V001_CORE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS populations (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS questions (
        id            TEXT PRIMARY KEY,
        population_id TEXT NOT NULL REFERENCES populations(id) ON DELETE CASCADE,
        text          TEXT NOT NULL,
        kind          TEXT NOT NULL,
        options       TEXT NOT NULL DEFAULT '[]',
        created_at    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_questions_population ON questions(population_id);
    CREATE INDEX IF NOT EXISTS idx_questions_created ON questions(created_at);

    CREATE TABLE IF NOT EXISTS simulation_results (
        id           TEXT PRIMARY KEY,
        question_id  TEXT NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
        job_id       TEXT,
        status       TEXT NOT NULL,
        payload      TEXT,
        raw_response TEXT,
        warnings     TEXT NOT NULL DEFAULT '[]',
        failure      TEXT,
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_results_question ON simulation_results(question_id);
    CREATE INDEX IF NOT EXISTS idx_results_created ON simulation_results(created_at);
";

/// Ordered migration steps; index + 1 is the schema version they produce.
const MIGRATIONS: &[&str] = &[V001_CORE_TABLES];

pub const LATEST_VERSION: u32 = MIGRATIONS.len() as u32;

pub fn schema_version(conn: &Connection) -> Result<u32, StoreError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_store_err)
}

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> Result<u32, StoreError> {
    let current = schema_version(conn)?;
    for (index, sql) in MIGRATIONS.iter().enumerate() {
        let version = index as u32 + 1;
        if version <= current {
            continue;
        }
        conn.execute_batch(sql).map_err(to_store_err)?;
        conn.pragma_update(None, "user_version", version)
            .map_err(to_store_err)?;
        tracing::debug!(version, "applied storage migration");
    }
    Ok(LATEST_VERSION.max(current))
}
