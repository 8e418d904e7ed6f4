use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use tracing::debug;

use crate::error::Error;
use crate::query::{Filter, Pagination};
use crate::store::IssuanceLog;
use crate::types::{CertificateRecord, Result};

/// Issuance log backed by the `realm_signing_log` table
pub struct SqliteIssuanceLog {
    /// Shared connection, used from the blocking pool
    conn: Arc<Mutex<Connection>>,
}

impl SqliteIssuanceLog {
    /// Open the database read-only
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening issuance log at {}", path.display());

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| Error::Storage("Connection lock poisoned".into()))?;
            f(&conn)
        })
        .await?
    }
}

/// Build the WHERE clause for `filter`, pushing its bound value
///
/// The column comes from the allow-list, the value is always bound.
fn where_clause(filter: Option<&Filter>, values: &mut Vec<Value>) -> String {
    match filter {
        Some(filter) => {
            values.push(Value::Text(filter.value.clone()));
            format!(" WHERE instr({}, ?) > 0", filter.field.column())
        }
        None => String::new(),
    }
}

/// Parse an `issued`/`expires` column: a plain date (midnight UTC) or RFC 3339
fn parse_log_time(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| Error::Storage(format!("Invalid {} value: {:?}", column, raw)))
}

#[async_trait]
impl IssuanceLog for SqliteIssuanceLog {
    async fn count<'a>(&self, filter: Option<&'a Filter>) -> Result<u64> {
        let filter = filter.cloned();

        self.with_connection(move |conn| {
            let mut values = Vec::new();
            let sql = format!(
                "SELECT COUNT(*) FROM realm_signing_log{}",
                where_clause(filter.as_ref(), &mut values)
            );

            let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn list<'a>(
        &self,
        filter: Option<&'a Filter>,
        pagination: Option<Pagination>,
    ) -> Result<Vec<CertificateRecord>> {
        let filter = filter.cloned();

        self.with_connection(move |conn| {
            let mut values = Vec::new();
            let mut sql = format!(
                "SELECT serial, requester, sub, issued, expires FROM realm_signing_log{} ORDER BY serial ASC",
                where_clause(filter.as_ref(), &mut values)
            );

            if let Some(p) = pagination {
                sql.push_str(" LIMIT ? OFFSET ?");
                values.push(Value::Integer(p.limit()));
                values.push(Value::Integer(p.offset()));
            }

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            // Convert only once every row was read, so a bad row fails the whole call
            rows.into_iter()
                .map(|(serial, requester, subject, issued, expires)| {
                    Ok(CertificateRecord {
                        serial,
                        requester,
                        subject,
                        issued: parse_log_time("issued", &issued)?,
                        expires: parse_log_time("expires", &expires)?,
                    })
                })
                .collect()
        })
        .await
    }
}
