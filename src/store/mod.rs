// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user document storage.
//!
//! [`DocumentStore`] is the backend contract: JSON documents keyed by user,
//! collection and id, plus a handful of singleton documents per user.
//! [`EntityStore`] layers typed records, id generation and server-side
//! timestamps on top of any backend, scoped to exactly one user.

pub mod memory;

pub use crate::db::SqliteStore;
pub use memory::MemoryStore;

use crate::error::{LedgerError, Result};
use crate::models::{
    Asset, AssetDraft, Notebook, NotebookDraft, Stamps, Transaction, TransactionDraft,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Transactions,
    Notebooks,
    Assets,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Notebooks => "notebooks",
            Collection::Assets => "assets",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Transactions => "transaction",
            Collection::Notebooks => "notebook",
            Collection::Assets => "asset",
        };
        f.write_str(name)
    }
}

/// One-per-user documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Singleton {
    Budget,
    Categories,
}

impl Singleton {
    pub fn as_str(&self) -> &'static str {
        match self {
            Singleton::Budget => "budget",
            Singleton::Categories => "categories",
        }
    }
}

/// Listing predicate a backend may push down. `FieldEq` compares a top-level
/// string field of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocFilter {
    All,
    FieldEq { field: &'static str, value: String },
}

impl DocFilter {
    pub fn field_eq(field: &'static str, value: impl Into<String>) -> Self {
        DocFilter::FieldEq {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            DocFilter::All => true,
            DocFilter::FieldEq { field, value } => {
                doc.get(*field).and_then(Value::as_str) == Some(value.as_str())
            }
        }
    }
}

/// A write inside a batch. Deletes of absent documents are no-ops so a batch
/// can be replayed after a partial failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Put {
        collection: Collection,
        id: String,
        doc: Value,
    },
    Delete {
        collection: Collection,
        id: String,
    },
}

impl Op {
    pub fn delete(collection: Collection, id: impl Into<String>) -> Self {
        Op::Delete {
            collection,
            id: id.into(),
        }
    }
}

/// Backend contract. Every call is scoped by `user`; there is no cross-user listing.
///
/// All methods may block on I/O.
pub trait DocumentStore {
    fn get(&self, user: &str, collection: Collection, id: &str) -> Result<Option<Value>>;

    fn list(&self, user: &str, collection: Collection, filter: &DocFilter) -> Result<Vec<Value>>;

    /// Fails if a document with this id already exists.
    fn insert(&self, user: &str, collection: Collection, id: &str, doc: Value) -> Result<()>;

    /// Fails with `NotFound` if the document is absent.
    fn replace(&self, user: &str, collection: Collection, id: &str, doc: Value) -> Result<()>;

    /// Fails with `NotFound` if the document is absent.
    fn remove(&self, user: &str, collection: Collection, id: &str) -> Result<()>;

    fn read_singleton(&self, user: &str, name: Singleton) -> Result<Option<Value>>;

    fn write_singleton(&self, user: &str, name: Singleton, doc: Value) -> Result<()>;

    /// Applies `ops` in order. Backends that can commit all-or-nothing override this
    /// together with [`DocumentStore::is_atomic`].
    fn commit(&self, user: &str, ops: Vec<Op>) -> Result<()> {
        apply_in_order(self, user, ops)
    }

    fn is_atomic(&self) -> bool {
        false
    }
}

/// Applies ops one at a time, stopping at the first failure.
pub fn apply_in_order<S: DocumentStore + ?Sized>(
    store: &S,
    user: &str,
    ops: Vec<Op>,
) -> Result<()> {
    let total = ops.len();
    for (applied, op) in ops.into_iter().enumerate() {
        let outcome = match op {
            Op::Put {
                collection,
                id,
                doc,
            } => match store.get(user, collection, &id)? {
                Some(_) => store.replace(user, collection, &id, doc),
                None => store.insert(user, collection, &id, doc),
            },
            Op::Delete { collection, id } => match store.remove(user, collection, &id) {
                Err(err) if err.is_not_found() => Ok(()),
                other => other,
            },
        };
        if let Err(err) = outcome {
            return Err(LedgerError::BatchPartialFailure {
                applied,
                total,
                reason: err.to_string(),
            });
        }
    }
    Ok(())
}

/// A typed entity living in one collection.
pub trait Record: Serialize + DeserializeOwned {
    type Draft;
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn build(id: String, draft: Self::Draft, stamps: Stamps) -> Self;
}

impl Record for Transaction {
    type Draft = TransactionDraft;
    const COLLECTION: Collection = Collection::Transactions;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: String, draft: TransactionDraft, stamps: Stamps) -> Self {
        draft.into_record(id, stamps)
    }
}

impl Record for Notebook {
    type Draft = NotebookDraft;
    const COLLECTION: Collection = Collection::Notebooks;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: String, draft: NotebookDraft, stamps: Stamps) -> Self {
        draft.into_record(id, stamps)
    }
}

impl Record for Asset {
    type Draft = AssetDraft;
    const COLLECTION: Collection = Collection::Assets;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(id: String, draft: AssetDraft, stamps: Stamps) -> Self {
        draft.into_record(id, stamps)
    }
}

/// Typed repository over a backend, bound to one user.
pub struct EntityStore<'a, S: DocumentStore + ?Sized> {
    backend: &'a S,
    user: String,
}

impl<'a, S: DocumentStore + ?Sized> EntityStore<'a, S> {
    pub fn new(backend: &'a S, user: impl Into<String>) -> Self {
        EntityStore {
            backend,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn is_atomic(&self) -> bool {
        self.backend.is_atomic()
    }

    pub fn create<R: Record>(&self, draft: R::Draft) -> Result<R> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let record = R::build(
            id.clone(),
            draft,
            Stamps {
                created_at: now,
                updated_at: now,
            },
        );
        let doc = serde_json::to_value(&record)?;
        self.backend.insert(&self.user, R::COLLECTION, &id, doc)?;
        info!(user = %self.user, kind = %R::COLLECTION, id = %id, "created");
        Ok(record)
    }

    /// Creates every record in one batch. When a non-atomic backend stops part way,
    /// the documents it already wrote are removed again before the error is returned.
    pub fn create_all<R: Record>(&self, drafts: Vec<R::Draft>) -> Result<Vec<R>> {
        let now = Utc::now();
        let stamps = Stamps {
            created_at: now,
            updated_at: now,
        };
        let records: Vec<R> = drafts
            .into_iter()
            .map(|draft| R::build(Uuid::new_v4().to_string(), draft, stamps))
            .collect();
        let ops = records
            .iter()
            .map(|r| -> Result<Op> {
                Ok(Op::Put {
                    collection: R::COLLECTION,
                    id: r.id().to_string(),
                    doc: serde_json::to_value(r)?,
                })
            })
            .collect::<Result<Vec<Op>>>()?;
        if let Err(err) = self.backend.commit(&self.user, ops) {
            if let LedgerError::BatchPartialFailure { applied, .. } = &err {
                let undo = records[..*applied]
                    .iter()
                    .map(|r| Op::delete(R::COLLECTION, r.id()))
                    .collect();
                if let Err(undo_err) = self.backend.commit(&self.user, undo) {
                    warn!(
                        user = %self.user,
                        kind = %R::COLLECTION,
                        error = %undo_err,
                        "rollback incomplete"
                    );
                }
            }
            return Err(err);
        }
        info!(user = %self.user, kind = %R::COLLECTION, count = records.len(), "created");
        Ok(records)
    }

    /// Full-record replace. Keeps the original `created_at`.
    pub fn update<R: Record>(&self, id: &str, draft: R::Draft) -> Result<R> {
        let existing: R = self
            .get(id)?
            .ok_or_else(|| LedgerError::not_found(R::COLLECTION, id))?;
        let record = R::build(
            id.to_string(),
            draft,
            Stamps {
                created_at: existing.created_at(),
                updated_at: Utc::now(),
            },
        );
        let doc = serde_json::to_value(&record)?;
        self.backend.replace(&self.user, R::COLLECTION, id, doc)?;
        info!(user = %self.user, kind = %R::COLLECTION, id = %id, "updated");
        Ok(record)
    }

    pub fn delete<R: Record>(&self, id: &str) -> Result<()> {
        self.backend.remove(&self.user, R::COLLECTION, id)?;
        info!(user = %self.user, kind = %R::COLLECTION, id = %id, "deleted");
        Ok(())
    }

    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        match self.backend.get(&self.user, R::COLLECTION, id)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    pub fn list<R: Record>(&self, filter: &DocFilter) -> Result<Vec<R>> {
        let docs = self.backend.list(&self.user, R::COLLECTION, filter)?;
        debug!(user = %self.user, kind = %R::COLLECTION, count = docs.len(), "listed");
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(LedgerError::from))
            .collect()
    }

    pub fn batch(&self, ops: Vec<Op>) -> Result<()> {
        let count = ops.len();
        self.backend.commit(&self.user, ops)?;
        info!(user = %self.user, ops = count, "batch committed");
        Ok(())
    }

    pub fn load<T: DeserializeOwned + Default>(&self, name: Singleton) -> Result<T> {
        match self.backend.read_singleton(&self.user, name)? {
            Some(doc) => Ok(serde_json::from_value(doc)?),
            None => Ok(T::default()),
        }
    }

    pub fn save<T: Serialize>(&self, name: Singleton, value: &T) -> Result<()> {
        let doc = serde_json::to_value(value)?;
        self.backend.write_singleton(&self.user, name, doc)?;
        debug!(user = %self.user, singleton = name.as_str(), "singleton written");
        Ok(())
    }
}
