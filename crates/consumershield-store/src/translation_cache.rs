//! Memo of draft-notice translations.
//!
//! Entries are scoped to the case whose notice was translated, then keyed by
//! target language and source length. A saved case's notice never changes,
//! so within one case the length is enough to tell revisions apart. Cache
//! failures never reach the caller.

use consumershield_core::SupportedLanguage;
use tracing::{debug, warn};

use crate::KvStore;

pub struct TranslationCache<S> {
    store: S,
}

impl<S: KvStore> TranslationCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Storage key for a translation of case `case_id`'s `source` into `language`.
    pub fn key(case_id: &str, language: SupportedLanguage, source: &str) -> String {
        format!("trans_{}_{}_{}", case_id, language, source.chars().count())
    }

    /// Previously stored translation, if any. Read errors count as a miss.
    pub fn get(
        &self,
        case_id: &str,
        language: SupportedLanguage,
        source: &str,
    ) -> Option<String> {
        let key = Self::key(case_id, language, source);
        match self.store.get(&key) {
            Ok(hit) => {
                debug!(key = %key, hit = hit.is_some(), "translation cache lookup");
                hit.filter(|t| !t.is_empty())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "translation cache read failed");
                None
            }
        }
    }

    /// Remember `translation`. Write errors are logged and dropped.
    pub fn put(
        &self,
        case_id: &str,
        language: SupportedLanguage,
        source: &str,
        translation: &str,
    ) {
        let key = Self::key(case_id, language, source);
        if let Err(e) = self.store.set(&key, translation) {
            warn!(key = %key, error = %e, "translation cache write failed");
        }
    }
}
