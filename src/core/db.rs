use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use tokio_rusqlite::Connection;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const DB_FILE_NAME: &str = "mailgraph.sqlite3";

/// Open the database stored in `db_path` (a directory) with the
/// custom SQL functions registered.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    let db = Connection::open(Path::new(db_path).join(DB_FILE_NAME)).await?;
    db.call(|conn| {
        register_functions(conn)?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Adds `REGEXP` support to the connection.
///
/// SQLite parses `X REGEXP Y` but leaves the implementation to the
/// application, calling `regexp(Y, X)`. Compiled patterns are cached
/// per statement.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern: Arc<Regex> = ctx.get_or_create_aux(0, |value| -> Result<_, BoxError> {
                Ok(Regex::new(value.as_str()?)?)
            })?;
            let is_match = {
                let text = ctx
                    .get_raw(1)
                    .as_str()
                    .map_err(|e| rusqlite::Error::UserFunctionError(e.into()))?;
                pattern.is_match(text)
            };
            Ok(is_match)
        },
    )
}

pub fn initialize_db(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r"
        BEGIN;

        CREATE TABLE IF NOT EXISTS person (
            email TEXT PRIMARY KEY,
            name TEXT,
            position TEXT,
            sector TEXT,
            start_date TEXT
        );

        CREATE TABLE IF NOT EXISTS mail (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            subject TEXT NOT NULL,
            sender TEXT NOT NULL,
            recipients TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS mail_date_idx ON mail (date);

        CREATE TABLE IF NOT EXISTS sent (
            mail_id INTEGER NOT NULL REFERENCES mail (id) ON DELETE CASCADE,
            person_email TEXT NOT NULL REFERENCES person (email),
            PRIMARY KEY (mail_id, person_email)
        );

        -- Row order of `received` is the order receivers are reported in
        CREATE TABLE IF NOT EXISTS received (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            mail_id INTEGER NOT NULL REFERENCES mail (id) ON DELETE CASCADE,
            person_email TEXT NOT NULL REFERENCES person (email)
        );
        CREATE INDEX IF NOT EXISTS received_mail_idx ON received (mail_id);

        COMMIT;
        ",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regexp(conn: &rusqlite::Connection, text: &str, pattern: &str) -> bool {
        conn.query_row("SELECT ?1 REGEXP ?2", [text, pattern], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn it_matches_with_regexp() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        assert!(regexp(&conn, "Quarterly numbers", "^(?:(?i).*QUARTERLY.*)$"));
        assert!(!regexp(&conn, "Lunch", "^(?:(?i).*quarterly.*)$"));
    }

    #[test]
    fn it_errors_on_invalid_patterns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let result: rusqlite::Result<bool> =
            conn.query_row("SELECT 'a' REGEXP '('", [], |row| row.get(0));
        assert!(result.is_err());
    }

    #[test]
    fn it_initializes_idempotently() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        initialize_db(&conn).unwrap();
        initialize_db(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name IN ('person', 'mail', 'sent', 'received')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }
}
