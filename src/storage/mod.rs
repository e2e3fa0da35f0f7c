//! Persisted record storage
//!
//! Both engine stores persist a single JSON document under a stable key.
//! This module defines that contract and its file and in-memory backends.

mod record_store;

pub use record_store::{
    read_record, write_record, FileRecordStore, MemoryRecordStore, RecordStore, Result,
    SharedRecordStore, StorageError,
};

#[cfg(test)]
pub(crate) use record_store::FailingRecordStore;
