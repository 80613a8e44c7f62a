//! Typed JSON document collections with a unique secondary index.
//!
//! Each collection owns two sled trees:
//! - `<collection>`: `record_id (12 bytes)` -> JSON document
//! - `index:unique:<collection>`: `unique value` -> `record_id`
//!
//! Writes touching both trees run in a single sled transaction, so the unique
//! index is the authoritative guard against duplicates even when two writers
//! pass a read-before-write check at the same time.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::{abort, TransactionError};
use sled::{Db, Transactional, Tree};

use crate::error::{Error, Result};
use crate::model::RecordId;

/// Prefix of unique index tree names.
pub const UNIQUE_INDEX_PREFIX: &str = "index:unique:";

/// A record type stored in a [`Collection`].
pub trait Document: Serialize + DeserializeOwned {
    /// Name of the sled tree holding the documents.
    const COLLECTION: &'static str;

    /// Primary key.
    fn id(&self) -> &RecordId;

    /// Value that must be unique across the collection, if any.
    fn unique_value(&self) -> Option<String>;
}

/// A collection of documents of type `T`.
pub struct Collection<T> {
    docs: Tree,
    unique: Tree,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Collection<T> {
    /// Open or create the collection trees in `db`.
    pub fn open(db: &Db) -> Result<Self> {
        let docs = db.open_tree(T::COLLECTION)?;
        let unique = db.open_tree(format!("{}{}", UNIQUE_INDEX_PREFIX, T::COLLECTION))?;

        Ok(Self {
            docs,
            unique,
            _marker: PhantomData,
        })
    }

    /// Get a document by id.
    pub fn get(&self, id: &RecordId) -> Result<Option<T>> {
        match self.docs.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get the document owning a unique value.
    pub fn find_unique(&self, value: &str) -> Result<Option<T>> {
        match self.unique_owner(value)? {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    /// Check whether a unique value is owned by a document other than `exclude`.
    pub fn unique_taken(&self, value: &str, exclude: Option<&RecordId>) -> Result<bool> {
        Ok(match self.unique_owner(value)? {
            Some(owner) => exclude != Some(&owner),
            None => false,
        })
    }

    /// Insert a new document, claiming its unique value.
    ///
    /// Fails with [`Error::UniqueViolation`] if the value is already claimed.
    pub fn insert(&self, doc: &T) -> Result<()> {
        let key: &[u8] = doc.id().as_bytes();
        let bytes = serde_json::to_vec(doc)?;
        let unique = doc.unique_value();

        (&self.docs, &self.unique)
            .transaction(|(docs, index)| {
                if docs.get(key)?.is_some() {
                    return abort(Error::InvalidData(format!(
                        "duplicate record id {} in {}",
                        doc.id(),
                        T::COLLECTION
                    )));
                }

                if let Some(value) = &unique {
                    if index.get(value.as_bytes())?.is_some() {
                        return abort(Error::UniqueViolation {
                            collection: T::COLLECTION,
                            value: value.clone(),
                        });
                    }
                    index.insert(value.as_bytes(), key)?;
                }

                docs.insert(key, bytes.as_slice())?;
                Ok(())
            })
            .map_err(Self::transaction_error)
    }

    /// Replace an existing document, moving its unique claim if the value changed.
    ///
    /// Fails with [`Error::NotFound`] if no document has this id.
    pub fn replace(&self, doc: &T) -> Result<()> {
        let key: &[u8] = doc.id().as_bytes();
        let bytes = serde_json::to_vec(doc)?;
        let new_unique = doc.unique_value();

        (&self.docs, &self.unique)
            .transaction(|(docs, index)| {
                let existing = match docs.get(key)? {
                    Some(existing) => existing,
                    None => return abort(Error::NotFound),
                };
                let existing: T = match serde_json::from_slice(&existing) {
                    Ok(existing) => existing,
                    Err(e) => return abort(Error::Serialization(e)),
                };
                let old_unique = existing.unique_value();

                if old_unique != new_unique {
                    if let Some(value) = &new_unique {
                        if let Some(owner) = index.get(value.as_bytes())? {
                            if &owner[..] != key {
                                return abort(Error::UniqueViolation {
                                    collection: T::COLLECTION,
                                    value: value.clone(),
                                });
                            }
                        }
                        index.insert(value.as_bytes(), key)?;
                    }
                    if let Some(value) = &old_unique {
                        index.remove(value.as_bytes())?;
                    }
                }

                docs.insert(key, bytes.as_slice())?;
                Ok(())
            })
            .map_err(Self::transaction_error)
    }

    /// Remove a document and release its unique claim.
    ///
    /// Returns the removed document, or `None` if it did not exist.
    pub fn remove(&self, id: &RecordId) -> Result<Option<T>> {
        let key: &[u8] = id.as_bytes();

        (&self.docs, &self.unique)
            .transaction(|(docs, index)| {
                let bytes = match docs.remove(key)? {
                    Some(bytes) => bytes,
                    None => return Ok(None),
                };
                let doc: T = match serde_json::from_slice(&bytes) {
                    Ok(doc) => doc,
                    Err(e) => return abort(Error::Serialization(e)),
                };

                if let Some(value) = doc.unique_value() {
                    if let Some(owner) = index.get(value.as_bytes())? {
                        if &owner[..] == key {
                            index.remove(value.as_bytes())?;
                        }
                    }
                }

                Ok(Some(doc))
            })
            .map_err(Self::transaction_error)
    }

    /// List documents in id (creation) order.
    pub fn list(&self, skip: usize, limit: usize) -> Result<Vec<T>> {
        self.docs
            .iter()
            .values()
            .skip(skip)
            .take(limit)
            .map(|bytes| -> Result<T> {
                let bytes = bytes?;
                Ok(serde_json::from_slice(&bytes)?)
            })
            .collect()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn unique_owner(&self, value: &str) -> Result<Option<RecordId>> {
        match self.unique.get(value.as_bytes())? {
            Some(bytes) => RecordId::from_bytes(&bytes).map(Some).ok_or_else(|| {
                Error::InvalidData(format!("corrupt unique index entry in {}", T::COLLECTION))
            }),
            None => Ok(None),
        }
    }

    fn transaction_error(err: TransactionError<Error>) -> Error {
        match err {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => Error::Storage(e),
        }
    }
}
