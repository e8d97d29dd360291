// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Collection, DocFilter, DocumentStore, Op, Singleton, apply_in_order};
use crate::error::{LedgerError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type DocKey = (String, Collection, String);

#[derive(Debug, Default)]
struct Inner {
    documents: BTreeMap<DocKey, Value>,
    singletons: BTreeMap<(String, Singleton), Value>,
}

/// In-process backend. Atomic by default; [`MemoryStore::non_atomic`] applies
/// batches op by op like a document database without multi-document transactions.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    atomic: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner::default()),
            atomic: true,
        }
    }

    pub fn non_atomic() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner::default()),
            atomic: false,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::StoreUnavailable("memory store poisoned".into()))
    }
}

fn key(user: &str, collection: Collection, id: &str) -> DocKey {
    (user.to_string(), collection, id.to_string())
}

impl DocumentStore for MemoryStore {
    fn get(&self, user: &str, collection: Collection, id: &str) -> Result<Option<Value>> {
        Ok(self.lock()?.documents.get(&key(user, collection, id)).cloned())
    }

    fn list(&self, user: &str, collection: Collection, filter: &DocFilter) -> Result<Vec<Value>> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .iter()
            .filter(|((u, c, _), doc)| u == user && *c == collection && filter.matches(doc))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    fn insert(&self, user: &str, collection: Collection, id: &str, doc: Value) -> Result<()> {
        let mut inner = self.lock()?;
        let k = key(user, collection, id);
        if inner.documents.contains_key(&k) {
            return Err(LedgerError::StoreUnavailable(format!(
                "{} '{}' already exists",
                collection, id
            )));
        }
        inner.documents.insert(k, doc);
        Ok(())
    }

    fn replace(&self, user: &str, collection: Collection, id: &str, doc: Value) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.documents.get_mut(&key(user, collection, id)) {
            Some(slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(LedgerError::not_found(collection, id)),
        }
    }

    fn remove(&self, user: &str, collection: Collection, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.documents.remove(&key(user, collection, id)) {
            Some(_) => Ok(()),
            None => Err(LedgerError::not_found(collection, id)),
        }
    }

    fn read_singleton(&self, user: &str, name: Singleton) -> Result<Option<Value>> {
        Ok(self
            .lock()?
            .singletons
            .get(&(user.to_string(), name))
            .cloned())
    }

    fn write_singleton(&self, user: &str, name: Singleton, doc: Value) -> Result<()> {
        self.lock()?.singletons.insert((user.to_string(), name), doc);
        Ok(())
    }

    fn commit(&self, user: &str, ops: Vec<Op>) -> Result<()> {
        if !self.atomic {
            return apply_in_order(self, user, ops);
        }
        let mut inner = self.lock()?;
        let mut staged = inner.documents.clone();
        for op in ops {
            match op {
                Op::Put {
                    collection,
                    id,
                    doc,
                } => {
                    staged.insert(key(user, collection, &id), doc);
                }
                Op::Delete { collection, id } => {
                    staged.remove(&key(user, collection, &id));
                }
            }
        }
        inner.documents = staged;
        Ok(())
    }

    fn is_atomic(&self) -> bool {
        self.atomic
    }
}
