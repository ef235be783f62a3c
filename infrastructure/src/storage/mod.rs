//! SQLite persistence for populations, questions and results
//!
//! [`SqliteSimulationStore`] implements the application's
//! [`SimulationStore`] port over a single `rusqlite` connection.

mod migrations;
mod queries;

use async_trait::async_trait;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use survey_sim_application::{SimulationStore, StoreError};
use survey_sim_domain::{
    Population, PopulationId, Question, QuestionId, ResultId, SimulationResult,
};
use tracing::info;

pub use migrations::LATEST_VERSION as SCHEMA_VERSION;

pub(crate) fn to_store_err(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// SQLite-backed [`SimulationStore`]
///
/// The connection mutex is held for one statement batch at a time and
/// never across an await point.
pub struct SqliteSimulationStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteSimulationStore {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path).map_err(to_store_err)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA foreign_keys = ON;
            ",
        )
        .map_err(to_store_err)?;
        let version = migrations::run_migrations(&conn)?;
        info!(path = %path.display(), schema_version = version, "Opened simulation store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// A private in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(to_store_err)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(to_store_err)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("store connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl SimulationStore for SqliteSimulationStore {
    async fn upsert_population(&self, population: &Population) -> Result<bool, StoreError> {
        queries::upsert_population(&*self.conn()?, population)
    }

    async fn get_population(&self, id: &PopulationId) -> Result<Option<Population>, StoreError> {
        queries::get_population(&*self.conn()?, id)
    }

    async fn list_populations(&self) -> Result<Vec<Population>, StoreError> {
        queries::list_populations(&*self.conn()?)
    }

    async fn delete_population(&self, id: &PopulationId) -> Result<Option<usize>, StoreError> {
        queries::delete_population(&*self.conn()?, id)
    }

    async fn insert_question(&self, question: &Question) -> Result<(), StoreError> {
        queries::insert_question(&*self.conn()?, question)
    }

    async fn get_question(&self, id: &QuestionId) -> Result<Option<Question>, StoreError> {
        queries::get_question(&*self.conn()?, id)
    }

    async fn recent_questions(&self, limit: usize) -> Result<Vec<Question>, StoreError> {
        queries::recent_questions(&*self.conn()?, limit)
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError> {
        queries::delete_question(&*self.conn()?, id)
    }

    async fn insert_result(&self, result: &SimulationResult) -> Result<(), StoreError> {
        queries::insert_result(&*self.conn()?, result)
    }

    async fn update_result(&self, result: &SimulationResult) -> Result<(), StoreError> {
        queries::update_result(&*self.conn()?, result)
    }

    async fn get_result(&self, id: &ResultId) -> Result<Option<SimulationResult>, StoreError> {
        queries::get_result(&*self.conn()?, id)
    }

    async fn results_for_question(
        &self,
        question_id: &QuestionId,
    ) -> Result<Vec<SimulationResult>, StoreError> {
        queries::results_for_question(&*self.conn()?, question_id, None)
    }

    async fn latest_result(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<SimulationResult>, StoreError> {
        Ok(queries::results_for_question(&*self.conn()?, question_id, Some(1))?
            .into_iter()
            .next())
    }
}
