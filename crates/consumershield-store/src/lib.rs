//! Storage layer: file-backed key-value store, case archive, translation memo cache.

mod archive;
mod error;
mod kv;
mod translation_cache;

pub use archive::{Archive, CASES_KEY, CaseArchive, Deletion};
pub use error::StoreError;
pub use kv::{FileStore, KvStore, MemoryStore};
pub use translation_cache::TranslationCache;
