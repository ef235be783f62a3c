//! Row-level SQL for populations, questions and results.
//!
//! Structured values (options, payload, raw response, warnings, failure) are
//! stored as JSON text; timestamps as RFC 3339 strings with nanoseconds so
//! lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::to_store_err;
use survey_sim_application::StoreError;
use survey_sim_domain::{
    JobId, Population, PopulationId, Question, QuestionId, ResultId, SimulationResult,
};

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Backend(format!("serialize: {e}")))
}

fn corrupt(id: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_time(id: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(id, format!("timestamp {raw:?}: {e}")))
}

fn parse_json<T: DeserializeOwned>(id: &str, column: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| corrupt(id, format!("{column}: {e}")))
}

fn parse_opt_json<T: DeserializeOwned>(
    id: &str,
    column: &str,
    raw: Option<String>,
) -> Result<Option<T>, StoreError> {
    raw.map(|raw| parse_json(id, column, &raw)).transpose()
}

// ==================== Populations ====================

struct PopulationRow {
    id: String,
    name: String,
    description: Option<String>,
    created_at: String,
}

const POPULATION_COLUMNS: &str = "id, name, description, created_at";

fn read_population_row(row: &Row<'_>) -> rusqlite::Result<PopulationRow> {
    Ok(PopulationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl PopulationRow {
    fn into_domain(self) -> Result<Population, StoreError> {
        let id = PopulationId::new(self.id.clone()).map_err(|e| corrupt(&self.id, e))?;
        Ok(Population {
            id,
            name: self.name,
            description: self.description,
            created_at: parse_time(&self.id, &self.created_at)?,
        })
    }
}

pub fn upsert_population(conn: &Connection, population: &Population) -> Result<bool, StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM populations WHERE id = ?1",
            params![population.id.as_str()],
            |_| Ok(()),
        )
        .optional()
        .map_err(to_store_err)?
        .is_some();

    conn.execute(
        "INSERT INTO populations (id, name, description, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, description = excluded.description",
        params![
            population.id.as_str(),
            population.name,
            population.description,
            timestamp(&population.created_at),
        ],
    )
    .map_err(to_store_err)?;
    Ok(!exists)
}

pub fn get_population(
    conn: &Connection,
    id: &PopulationId,
) -> Result<Option<Population>, StoreError> {
    conn.query_row(
        &format!("SELECT {POPULATION_COLUMNS} FROM populations WHERE id = ?1"),
        params![id.as_str()],
        read_population_row,
    )
    .optional()
    .map_err(to_store_err)?
    .map(PopulationRow::into_domain)
    .transpose()
}

pub fn list_populations(conn: &Connection) -> Result<Vec<Population>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {POPULATION_COLUMNS} FROM populations ORDER BY created_at ASC, rowid ASC"
        ))
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map([], read_population_row)
        .map_err(to_store_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_store_err)?;
    rows.into_iter().map(PopulationRow::into_domain).collect()
}

pub fn delete_population(conn: &Connection, id: &PopulationId) -> Result<Option<usize>, StoreError> {
    let tx = conn.unchecked_transaction().map_err(to_store_err)?;
    let questions: usize = tx
        .query_row(
            "SELECT COUNT(*) FROM questions WHERE population_id = ?1",
            params![id.as_str()],
            |row| row.get(0),
        )
        .map_err(to_store_err)?;
    let deleted = tx
        .execute("DELETE FROM populations WHERE id = ?1", params![id.as_str()])
        .map_err(to_store_err)?;
    tx.commit().map_err(to_store_err)?;

    Ok((deleted > 0).then_some(questions))
}

// ==================== Questions ====================

struct QuestionRow {
    id: String,
    population_id: String,
    text: String,
    kind: String,
    options: String,
    created_at: String,
}

const QUESTION_COLUMNS: &str = "id, population_id, text, kind, options, created_at";

fn read_question_row(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
    Ok(QuestionRow {
        id: row.get(0)?,
        population_id: row.get(1)?,
        text: row.get(2)?,
        kind: row.get(3)?,
        options: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl QuestionRow {
    fn into_domain(self) -> Result<Question, StoreError> {
        let id = &self.id;
        Ok(Question {
            id: id.parse::<QuestionId>().map_err(|e| corrupt(id, e))?,
            population_id: PopulationId::new(self.population_id.clone())
                .map_err(|e| corrupt(id, e))?,
            kind: self.kind.parse().map_err(|e| corrupt(id, e))?,
            options: parse_json(id, "options", &self.options)?,
            created_at: parse_time(id, &self.created_at)?,
            text: self.text,
        })
    }
}

pub fn insert_question(conn: &Connection, question: &Question) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO questions (id, population_id, text, kind, options, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            question.id.to_string(),
            question.population_id.as_str(),
            question.text,
            question.kind.as_str(),
            to_json(&question.options)?,
            timestamp(&question.created_at),
        ],
    )
    .map_err(to_store_err)?;
    Ok(())
}

pub fn get_question(conn: &Connection, id: &QuestionId) -> Result<Option<Question>, StoreError> {
    conn.query_row(
        &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"),
        params![id.to_string()],
        read_question_row,
    )
    .optional()
    .map_err(to_store_err)?
    .map(QuestionRow::into_domain)
    .transpose()
}

pub fn recent_questions(conn: &Connection, limit: usize) -> Result<Vec<Question>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map(params![limit as i64], read_question_row)
        .map_err(to_store_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_store_err)?;
    rows.into_iter().map(QuestionRow::into_domain).collect()
}

pub fn delete_question(conn: &Connection, id: &QuestionId) -> Result<bool, StoreError> {
    let deleted = conn
        .execute("DELETE FROM questions WHERE id = ?1", params![id.to_string()])
        .map_err(to_store_err)?;
    Ok(deleted > 0)
}

// ==================== Results ====================

struct ResultRow {
    id: String,
    question_id: String,
    job_id: Option<String>,
    status: String,
    payload: Option<String>,
    raw_response: Option<String>,
    warnings: String,
    failure: Option<String>,
    created_at: String,
    updated_at: String,
}

const RESULT_COLUMNS: &str = "id, question_id, job_id, status, payload, raw_response, \
                              warnings, failure, created_at, updated_at";

fn read_result_row(row: &Row<'_>) -> rusqlite::Result<ResultRow> {
    Ok(ResultRow {
        id: row.get(0)?,
        question_id: row.get(1)?,
        job_id: row.get(2)?,
        status: row.get(3)?,
        payload: row.get(4)?,
        raw_response: row.get(5)?,
        warnings: row.get(6)?,
        failure: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl ResultRow {
    fn into_domain(self) -> Result<SimulationResult, StoreError> {
        let id = &self.id;
        Ok(SimulationResult::restore(
            id.parse::<ResultId>().map_err(|e| corrupt(id, e))?,
            self.question_id
                .parse::<QuestionId>()
                .map_err(|e| corrupt(id, e))?,
            self.job_id
                .map(JobId::new)
                .transpose()
                .map_err(|e| corrupt(id, e))?,
            self.status.parse().map_err(|e| corrupt(id, e))?,
            parse_opt_json(id, "payload", self.payload)?,
            parse_opt_json(id, "raw_response", self.raw_response)?,
            parse_json(id, "warnings", &self.warnings)?,
            parse_opt_json(id, "failure", self.failure)?,
            parse_time(id, &self.created_at)?,
            parse_time(id, &self.updated_at)?,
        ))
    }
}

struct ResultColumns {
    job_id: Option<String>,
    payload: Option<String>,
    raw_response: Option<String>,
    warnings: String,
    failure: Option<String>,
}

impl ResultColumns {
    fn encode(result: &SimulationResult) -> Result<Self, StoreError> {
        Ok(Self {
            job_id: result.job_id.as_ref().map(|j| j.as_str().to_string()),
            payload: result.payload.as_ref().map(to_json).transpose()?,
            raw_response: result.raw_response.as_ref().map(to_json).transpose()?,
            warnings: to_json(&result.warnings)?,
            failure: result.failure.as_ref().map(to_json).transpose()?,
        })
    }
}

pub fn insert_result(conn: &Connection, result: &SimulationResult) -> Result<(), StoreError> {
    let columns = ResultColumns::encode(result)?;
    conn.execute(
        "INSERT INTO simulation_results
            (id, question_id, job_id, status, payload, raw_response,
             warnings, failure, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            result.id.to_string(),
            result.question_id.to_string(),
            columns.job_id,
            result.status().as_str(),
            columns.payload,
            columns.raw_response,
            columns.warnings,
            columns.failure,
            timestamp(&result.created_at),
            timestamp(&result.updated_at),
        ],
    )
    .map_err(to_store_err)?;
    Ok(())
}

pub fn update_result(conn: &Connection, result: &SimulationResult) -> Result<(), StoreError> {
    let columns = ResultColumns::encode(result)?;
    let updated = conn
        .execute(
            "UPDATE simulation_results
             SET job_id = ?2, status = ?3, payload = ?4, raw_response = ?5,
                 warnings = ?6, failure = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                result.id.to_string(),
                columns.job_id,
                result.status().as_str(),
                columns.payload,
                columns.raw_response,
                columns.warnings,
                columns.failure,
                timestamp(&result.updated_at),
            ],
        )
        .map_err(to_store_err)?;
    if updated == 0 {
        return Err(StoreError::Missing(format!("result {}", result.id)));
    }
    Ok(())
}

pub fn get_result(conn: &Connection, id: &ResultId) -> Result<Option<SimulationResult>, StoreError> {
    conn.query_row(
        &format!("SELECT {RESULT_COLUMNS} FROM simulation_results WHERE id = ?1"),
        params![id.to_string()],
        read_result_row,
    )
    .optional()
    .map_err(to_store_err)?
    .map(ResultRow::into_domain)
    .transpose()
}

pub fn results_for_question(
    conn: &Connection,
    question_id: &QuestionId,
    limit: Option<usize>,
) -> Result<Vec<SimulationResult>, StoreError> {
    let limit = limit.map_or(-1, |l| l as i64);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RESULT_COLUMNS} FROM simulation_results WHERE question_id = ?1
             ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        ))
        .map_err(to_store_err)?;
    let rows = stmt
        .query_map(params![question_id.to_string(), limit], read_result_row)
        .map_err(to_store_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_store_err)?;
    rows.into_iter().map(ResultRow::into_domain).collect()
}
