use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;
use whosaid_eval::{EvalReport, EvalReportRepository};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// SQLite-backed report store. Reports are kept as their JSON rendering,
/// with id, uri and creation time denormalized for lookup and ordering.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        tracing::debug!(path = %path.display(), "opened report database");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS eval_reports (
                id TEXT PRIMARY KEY,
                uri TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                report_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_eval_reports_created_at
                ON eval_reports(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_eval_reports_uri ON eval_reports(uri);
            "#,
        )?;
        Ok(())
    }

    /// All stored reports for one recording, newest first.
    pub fn list_by_uri(&self, uri: &str) -> Result<Vec<EvalReport>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT report_json FROM eval_reports WHERE uri = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([uri], |row| row.get::<_, String>(0))?;

        let mut reports = Vec::new();
        for row in rows {
            reports.push(serde_json::from_str(&row?)?);
        }
        Ok(reports)
    }
}

impl EvalReportRepository for Database {
    type Error = StorageError;

    fn save(&self, report: &EvalReport) -> Result<()> {
        let json = serde_json::to_string(report)?;
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO eval_reports (id, uri, created_at, report_json) VALUES (?1, ?2, ?3, ?4)",
            (
                report.id.to_string(),
                &report.uri,
                report.created_at.timestamp_millis(),
                json,
            ),
        )?;
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<EvalReport> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let json: String = conn
            .query_row(
                "SELECT report_json FROM eval_reports WHERE id = ?1",
                [id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    StorageError::NotFound(format!("report {id}"))
                }
                other => StorageError::DatabaseError(other),
            })?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list(&self) -> Result<Vec<EvalReport>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT report_json FROM eval_reports ORDER BY created_at DESC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut reports = Vec::new();
        for row in rows {
            let json = row?;
            match serde_json::from_str(&json) {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable report row"),
            }
        }
        Ok(reports)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let affected = conn.execute("DELETE FROM eval_reports WHERE id = ?1", [id.to_string()])?;
        if affected == 0 {
            return Err(StorageError::NotFound(format!("report {id}")));
        }
        Ok(())
    }
}
