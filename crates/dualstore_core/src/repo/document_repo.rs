//! Document-store customer repository contract and implementations.
//!
//! # Responsibility
//! - Own one named collection of `CustomerDocument` values keyed by a
//!   store-assigned string id.
//! - Offer the same contract over a SQLite JSON collection and an
//!   in-process collection.
//!
//! # Invariants
//! - `save` assigns a UUID v4 id to documents without one and upserts
//!   documents that already carry one.
//! - Listing operations return documents in first-insertion order.
//! - `find_by_first_name` returns `Ok(None)` on no match and
//!   `RepoError::NonUniqueResult` on more than one match.

use crate::model::document::{CustomerDocument, DocumentId};
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Collection used when no explicit name is given.
pub const DEFAULT_COLLECTION: &str = "customer";

const FIRST_NAME_FIELD: &str = "firstName";

/// Repository interface for customer documents.
pub trait CustomerDocumentRepository {
    /// Removes every document in the collection and returns how many were removed.
    fn delete_all(&self) -> RepoResult<usize>;
    /// Stores `document` and returns it with its id populated.
    fn save(&self, document: &CustomerDocument) -> RepoResult<CustomerDocument>;
    fn find_all(&self) -> RepoResult<Vec<CustomerDocument>>;
    fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomerDocument>>;
    /// Exact-match single-result lookup on `firstName`.
    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Option<CustomerDocument>>;
    /// Exact-match lookup on `lastName`.
    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<CustomerDocument>>;
    fn count(&self) -> RepoResult<usize>;
}

impl<T: CustomerDocumentRepository + ?Sized> CustomerDocumentRepository for &T {
    fn delete_all(&self) -> RepoResult<usize> {
        (**self).delete_all()
    }

    fn save(&self, document: &CustomerDocument) -> RepoResult<CustomerDocument> {
        (**self).save(document)
    }

    fn find_all(&self) -> RepoResult<Vec<CustomerDocument>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomerDocument>> {
        (**self).find_by_id(id)
    }

    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Option<CustomerDocument>> {
        (**self).find_by_first_name(first_name)
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<CustomerDocument>> {
        (**self).find_by_last_name(last_name)
    }

    fn count(&self) -> RepoResult<usize> {
        (**self).count()
    }
}

/// SQLite-backed document collection stored in the migrated `documents` table.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
    collection: String,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    /// Binds the repository to the default `customer` collection.
    ///
    /// The connection must come from `db::open_db*` so the `documents`
    /// table exists.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_collection(conn, DEFAULT_COLLECTION)
    }

    pub fn with_collection(conn: &'conn Connection, collection: impl Into<String>) -> Self {
        Self {
            conn,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn query_by_field(
        &self,
        json_path: &str,
        value: &str,
        limit: Option<u32>,
    ) -> RepoResult<Vec<CustomerDocument>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, body
             FROM documents
             WHERE collection = ?1
               AND json_extract(body, ?2) = ?3
             ORDER BY rowid
             LIMIT ?4;",
        )?;
        let limit = limit.map_or(-1, i64::from);
        let rows = stmt
            .query_map(
                params![self.collection, json_path, value, limit],
                read_id_and_body,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, body)| parse_document(&id, &body))
            .collect()
    }
}

impl CustomerDocumentRepository for SqliteDocumentRepository<'_> {
    fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1;",
            [self.collection.as_str()],
        )?;
        info!(
            "event=collection_clear module=repo status=ok collection={} removed={}",
            self.collection, removed
        );
        Ok(removed)
    }

    fn save(&self, document: &CustomerDocument) -> RepoResult<CustomerDocument> {
        let stored = with_assigned_id(document);
        let id = stored.id.as_deref().unwrap_or_default();
        let body = serde_json::to_string(&stored)?;

        self.conn.execute(
            "INSERT INTO documents (collection, id, body)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body;",
            params![self.collection, id, body],
        )?;
        debug!(
            "event=document_save module=repo status=ok collection={} id={}",
            self.collection, id
        );

        Ok(stored)
    }

    fn find_all(&self) -> RepoResult<Vec<CustomerDocument>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, body
             FROM documents
             WHERE collection = ?1
             ORDER BY rowid;",
        )?;
        let rows = stmt
            .query_map([self.collection.as_str()], read_id_and_body)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, body)| parse_document(&id, &body))
            .collect()
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomerDocument>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, body
                 FROM documents
                 WHERE collection = ?1 AND id = ?2;",
                params![self.collection, id],
                read_id_and_body,
            )
            .optional()?;

        row.map(|(id, body)| parse_document(&id, &body))
            .transpose()
    }

    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Option<CustomerDocument>> {
        let path = format!("$.{FIRST_NAME_FIELD}");
        let matches = self.query_by_field(&path, first_name, Some(2))?;
        single_result(matches, first_name)
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<CustomerDocument>> {
        self.query_by_field("$.lastName", last_name, None)
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1;",
            [self.collection.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative document count {count}")))
    }
}

/// In-process document collection.
///
/// Holds no connection; contents live as long as the repository value.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: RwLock<Vec<CustomerDocument>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<CustomerDocument>>> {
        self.documents.read().map_err(|_| RepoError::StorePoisoned)
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<CustomerDocument>>> {
        self.documents.write().map_err(|_| RepoError::StorePoisoned)
    }

    fn filter<F>(&self, predicate: F) -> RepoResult<Vec<CustomerDocument>>
    where
        F: Fn(&CustomerDocument) -> bool,
    {
        Ok(self
            .read()?
            .iter()
            .filter(|document| predicate(*document))
            .cloned()
            .collect())
    }
}

impl CustomerDocumentRepository for InMemoryDocumentRepository {
    fn delete_all(&self) -> RepoResult<usize> {
        let mut documents = self.write()?;
        let removed = documents.len();
        documents.clear();
        info!(
            "event=collection_clear module=repo status=ok collection=memory removed={}",
            removed
        );
        Ok(removed)
    }

    fn save(&self, document: &CustomerDocument) -> RepoResult<CustomerDocument> {
        let stored = with_assigned_id(document);
        let mut documents = self.write()?;
        match documents.iter_mut().find(|existing| existing.id == stored.id) {
            Some(existing) => *existing = stored.clone(),
            None => documents.push(stored.clone()),
        }
        Ok(stored)
    }

    fn find_all(&self) -> RepoResult<Vec<CustomerDocument>> {
        Ok(self.read()?.clone())
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomerDocument>> {
        Ok(self
            .read()?
            .iter()
            .find(|document| document.id.as_deref() == Some(id))
            .cloned())
    }

    fn find_by_first_name(&self, first_name: &str) -> RepoResult<Option<CustomerDocument>> {
        let matches = self.filter(|document| document.first_name == first_name)?;
        single_result(matches, first_name)
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<CustomerDocument>> {
        self.filter(|document| document.last_name == last_name)
    }

    fn count(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }
}

fn with_assigned_id(document: &CustomerDocument) -> CustomerDocument {
    let mut stored = document.clone();
    if stored.id.as_deref().map_or(true, str::is_empty) {
        stored.id = Some(new_document_id());
    }
    stored
}

fn new_document_id() -> DocumentId {
    Uuid::new_v4().to_string()
}

fn single_result(
    mut matches: Vec<CustomerDocument>,
    value: &str,
) -> RepoResult<Option<CustomerDocument>> {
    if matches.len() > 1 {
        return Err(RepoError::NonUniqueResult {
            field: FIRST_NAME_FIELD,
            value: value.to_string(),
        });
    }
    Ok(matches.pop())
}

fn read_id_and_body(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get("id")?, row.get("body")?))
}

fn parse_document(id: &str, body: &str) -> RepoResult<CustomerDocument> {
    let document: CustomerDocument = serde_json::from_str(body)?;
    if document.id.as_deref() != Some(id) {
        return Err(RepoError::InvalidData(format!(
            "document body id {:?} does not match stored id `{id}`",
            document.id
        )));
    }
    Ok(document)
}
