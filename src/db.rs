// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use crate::store::{Collection, DocFilter, DocumentStore, Op, Singleton};
use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

/// Document store on a single SQLite file. Batches run inside one SQLite
/// transaction, so they are all-or-nothing.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                LedgerError::StoreUnavailable(format!("create {}: {}", parent.display(), err))
            })?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened sqlite store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS documents(
        user_id TEXT NOT NULL,
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body TEXT NOT NULL,
        written_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(user_id, collection, id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_scope ON documents(user_id, collection);

    CREATE TABLE IF NOT EXISTS singletons(
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        body TEXT NOT NULL,
        written_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(user_id, name)
    );
    "#,
    )?;
    Ok(())
}

fn parse_body(body: String) -> Result<Value> {
    Ok(serde_json::from_str(&body)?)
}

fn apply_op(conn: &Connection, user: &str, op: &Op) -> rusqlite::Result<()> {
    match op {
        Op::Put {
            collection,
            id,
            doc,
        } => {
            conn.execute(
                "INSERT INTO documents(user_id, collection, id, body) VALUES (?1,?2,?3,?4)
                 ON CONFLICT(user_id, collection, id) DO UPDATE SET body=excluded.body,
                 written_at=datetime('now')",
                params![user, collection.as_str(), id, doc.to_string()],
            )?;
        }
        Op::Delete { collection, id } => {
            conn.execute(
                "DELETE FROM documents WHERE user_id=?1 AND collection=?2 AND id=?3",
                params![user, collection.as_str(), id],
            )?;
        }
    }
    Ok(())
}

impl DocumentStore for SqliteStore {
    fn get(&self, user: &str, collection: Collection, id: &str) -> Result<Option<Value>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE user_id=?1 AND collection=?2 AND id=?3",
                params![user, collection.as_str(), id],
                |r| r.get(0),
            )
            .optional()?;
        body.map(parse_body).transpose()
    }

    fn list(&self, user: &str, collection: Collection, filter: &DocFilter) -> Result<Vec<Value>> {
        let mut data = Vec::new();
        match filter {
            DocFilter::All => {
                let mut stmt = self.conn.prepare(
                    "SELECT body FROM documents WHERE user_id=?1 AND collection=?2 ORDER BY id",
                )?;
                let rows =
                    stmt.query_map(params![user, collection.as_str()], |r| r.get::<_, String>(0))?;
                for row in rows {
                    data.push(parse_body(row?)?);
                }
            }
            DocFilter::FieldEq { field, value } => {
                let mut stmt = self.conn.prepare(
                    "SELECT body FROM documents WHERE user_id=?1 AND collection=?2
                     AND json_extract(body, ?3)=?4 ORDER BY id",
                )?;
                let path = format!("$.{}", field);
                let rows = stmt.query_map(
                    params![user, collection.as_str(), path, value],
                    |r| r.get::<_, String>(0),
                )?;
                for row in rows {
                    data.push(parse_body(row?)?);
                }
            }
        }
        Ok(data)
    }

    fn insert(&self, user: &str, collection: Collection, id: &str, doc: Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO documents(user_id, collection, id, body) VALUES (?1,?2,?3,?4)",
            params![user, collection.as_str(), id, doc.to_string()],
        )?;
        Ok(())
    }

    fn replace(&self, user: &str, collection: Collection, id: &str, doc: Value) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE documents SET body=?4, written_at=datetime('now')
             WHERE user_id=?1 AND collection=?2 AND id=?3",
            params![user, collection.as_str(), id, doc.to_string()],
        )?;
        if changed == 0 {
            return Err(LedgerError::not_found(collection, id));
        }
        Ok(())
    }

    fn remove(&self, user: &str, collection: Collection, id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE user_id=?1 AND collection=?2 AND id=?3",
            params![user, collection.as_str(), id],
        )?;
        if changed == 0 {
            return Err(LedgerError::not_found(collection, id));
        }
        Ok(())
    }

    fn read_singleton(&self, user: &str, name: Singleton) -> Result<Option<Value>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM singletons WHERE user_id=?1 AND name=?2",
                params![user, name.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        body.map(parse_body).transpose()
    }

    fn write_singleton(&self, user: &str, name: Singleton, doc: Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO singletons(user_id, name, body) VALUES (?1,?2,?3)
             ON CONFLICT(user_id, name) DO UPDATE SET body=excluded.body,
             written_at=datetime('now')",
            params![user, name.as_str(), doc.to_string()],
        )?;
        Ok(())
    }

    fn commit(&self, user: &str, ops: Vec<Op>) -> Result<()> {
        let total = ops.len();
        let batch_failed = |err: rusqlite::Error| LedgerError::BatchPartialFailure {
            applied: 0,
            total,
            reason: err.to_string(),
        };
        let tx = self.conn.unchecked_transaction().map_err(batch_failed)?;
        for op in &ops {
            apply_op(&tx, user, op).map_err(batch_failed)?;
        }
        tx.commit().map_err(batch_failed)?;
        Ok(())
    }

    fn is_atomic(&self) -> bool {
        true
    }
}
