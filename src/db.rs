use std::fs;
use std::path::Path;

use crate::models::Note;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, params};

const SCHEMA_SQL: &str = include_str!("../schema.sql");

/// What the scrape flow needs from a notes store.
pub trait NoteStore {
    fn exists(&self, url: &str) -> Result<bool>;

    /// Insert the note, or replace the content of the note with the same url.
    fn upsert(&mut self, note: &Note) -> Result<()>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

pub struct Db {
    conn: Connection,
}

impl Db {
    /// Opens the store at `path`, creating the parent directory, the file
    /// and the schema when missing. Safe to call on every run.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            // create_dir_all is idempotent
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data dir at {}", dir.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open DB at {}", path.display()))?;
        conn.execute_batch(SCHEMA_SQL).context("Failed to initialize schema")?;
        debug!("Opened notes DB at {}", path.display());

        Ok(Db { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL).context("Failed to initialize schema")?;
        Ok(Db { conn })
    }

    // a missing row is "no content", not an error
    #[cfg(test)]
    pub fn content(&self, url: &str) -> Result<Option<String>> {
        use rusqlite::OptionalExtension;

        let content = self
            .conn
            .query_row(
                "SELECT content FROM notes WHERE url = ?",
                [url],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;

        Ok(content.map(Option::unwrap_or_default))
    }
}

impl NoteStore for Db {
    fn exists(&self, url: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE url = ?",
            [url],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn upsert(&mut self, note: &Note) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO notes (url, content) VALUES (?, ?)
             ON CONFLICT(url) DO UPDATE SET content = excluded.content",
            params![&note.url, &note.content],
        )
        .with_context(|| format!("Failed to save note for {}", note.url))?;

        tx.commit().context("Failed to commit note")?;

        Ok(())
    }

    fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close DB")
    }
}
