//! Case archive: the list of saved strategies, newest first.
//!
//! The whole list lives as one JSON document under [`CASES_KEY`] and is
//! rewritten in full on every save or delete.

use std::sync::Mutex;

use consumershield_core::{SavedCase, StrategyRecord};
use tracing::{info, warn};

use crate::{KvStore, StoreError};

/// Storage key holding the serialised case list.
pub const CASES_KEY: &str = "consumer_shield_cases";

/// Persistence capability for finalised strategy records.
pub trait Archive {
    /// All saved cases, newest first.
    fn list(&self) -> Result<Vec<SavedCase>, StoreError>;

    /// Look up one case by id.
    fn get(&self, id: &str) -> Result<SavedCase, StoreError> {
        self.list()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::CaseNotFound(id.to_string()))
    }

    /// Wrap `result` in a new [`SavedCase`] and prepend it to the archive.
    fn save(&self, complaint: &str, result: StrategyRecord) -> Result<SavedCase, StoreError>;

    /// Remove the case with `id`. Deleting an unknown id is not an error.
    fn delete(&self, id: &str) -> Result<Deletion, StoreError>;
}

/// Result of [`Archive::delete`].
#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    /// Whether a case with the requested id existed.
    pub removed: bool,
    /// The archive after the delete, newest first.
    pub remaining: Vec<SavedCase>,
}

/// [`Archive`] over any [`KvStore`].
pub struct CaseArchive<S> {
    store: S,
    // Serialises read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl<S: KvStore> CaseArchive<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> Result<Vec<SavedCase>, StoreError> {
        let Some(raw) = self.store.get(CASES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cases) => Ok(cases),
            Err(e) => {
                warn!(error = %e, "failed to parse stored cases, treating archive as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, cases: &[SavedCase]) -> Result<(), StoreError> {
        let json = serde_json::to_string(cases)?;
        self.store.set(CASES_KEY, &json)
    }

    fn locked<T>(&self, f: impl FnOnce() -> Result<T, StoreError>) -> Result<T, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Other(format!("mutex poisoned: {e}")))?;
        f()
    }
}

impl<S: KvStore> Archive for CaseArchive<S> {
    fn list(&self) -> Result<Vec<SavedCase>, StoreError> {
        self.read()
    }

    fn save(&self, complaint: &str, result: StrategyRecord) -> Result<SavedCase, StoreError> {
        let saved = SavedCase {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            complaint: complaint.to_string(),
            result,
        };

        self.locked(|| {
            let mut cases = self.read()?;
            cases.insert(0, saved.clone());
            self.write(&cases)?;
            info!(id = %saved.id, total = cases.len(), "saved case");
            Ok(())
        })?;

        Ok(saved)
    }

    fn delete(&self, id: &str) -> Result<Deletion, StoreError> {
        self.locked(|| {
            let mut cases = self.read()?;
            let before = cases.len();
            cases.retain(|c| c.id != id);
            let removed = cases.len() < before;
            self.write(&cases)?;
            info!(id, removed, remaining = cases.len(), "deleted case");
            Ok(Deletion {
                removed,
                remaining: cases,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStore, MemoryStore};
    use consumershield_core::{
        CalculationItem, Compensation, LegalGround, Precedent, RiskAnalysis, RiskLevel,
    };
    use tempfile::TempDir;

    fn record(section: &str) -> StrategyRecord {
        StrategyRecord {
            legal_ground: LegalGround {
                section: section.into(),
                quote: "deficiency means any fault...".into(),
                term: None,
            },
            precedent: Precedent {
                case_name: "Pioneer Urban Land v. Govindan Raghavan".into(),
                summary: "One-sided clauses are unfair trade practice.".into(),
                strength_score: 80,
            },
            risk_analysis: RiskAnalysis {
                counter_arguments: vec!["Force majeure".into()],
                risk_level: RiskLevel::Low,
                mitigation_strategy: "Show RERA registration lapse.".into(),
            },
            compensation: Compensation {
                breakdown: "Refund plus interest".into(),
                total: "₹10,00,000".into(),
                calculation: vec![CalculationItem::estimated_total("₹10,00,000")],
            },
            draft_notice_text: "To, The Builder".into(),
        }
    }

    #[test]
    fn empty_archive_lists_nothing() {
        let archive = CaseArchive::new(MemoryStore::new());
        assert!(archive.list().unwrap().is_empty());
    }

    #[test]
    fn save_assigns_fresh_id_and_timestamp() {
        let archive = CaseArchive::new(MemoryStore::new());
        let before = chrono::Utc::now().timestamp_millis();
        let a = archive
            .save("Delayed delivery of booked flat by 3 years", record("2(11)"))
            .unwrap();
        let b = archive
            .save("Defective refrigerator not replaced", record("2(10)"))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
        assert!(a.timestamp >= before);
    }

    #[test]
    fn newest_case_listed_first() {
        let archive = CaseArchive::new(MemoryStore::new());
        archive.save("first complaint text here", record("1")).unwrap();
        let second = archive.save("second complaint text here", record("2")).unwrap();
        let cases = archive.list().unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].id, second.id);
        assert_eq!(cases[0].result.legal_ground.section, "2");
    }

    #[test]
    fn get_finds_by_id() {
        let archive = CaseArchive::new(MemoryStore::new());
        let saved = archive.save("complaint about insurer", record("2(42)")).unwrap();
        assert_eq!(archive.get(&saved.id).unwrap(), saved);
        assert!(matches!(
            archive.get("missing").unwrap_err(),
            StoreError::CaseNotFound(_)
        ));
    }

    #[test]
    fn delete_returns_remaining() {
        let archive = CaseArchive::new(MemoryStore::new());
        let a = archive.save("complaint a is long enough", record("a")).unwrap();
        let b = archive.save("complaint b is long enough", record("b")).unwrap();
        let deletion = archive.delete(&a.id).unwrap();
        assert!(deletion.removed);
        assert_eq!(deletion.remaining.len(), 1);
        assert_eq!(deletion.remaining[0].id, b.id);
        assert_eq!(archive.list().unwrap(), deletion.remaining);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let archive = CaseArchive::new(MemoryStore::new());
        archive.save("complaint text is long enough", record("a")).unwrap();
        let deletion = archive.delete("nope").unwrap();
        assert!(!deletion.removed);
        assert_eq!(deletion.remaining.len(), 1);
    }

    #[test]
    fn corrupt_archive_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(CASES_KEY, "{not json").unwrap();
        let archive = CaseArchive::new(store);
        assert!(archive.list().unwrap().is_empty());
    }

    #[test]
    fn archive_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let saved = CaseArchive::new(FileStore::open(tmp.path()).unwrap())
            .save("Delayed delivery of booked flat by 3 years", record("2(11)"))
            .unwrap();

        let reopened = CaseArchive::new(FileStore::open(tmp.path()).unwrap());
        let cases = reopened.list().unwrap();
        assert_eq!(cases, vec![saved]);
    }

    #[test]
    fn stored_json_uses_snake_case_fields() {
        let archive = CaseArchive::new(MemoryStore::new());
        archive.save("complaint text is long enough", record("2(11)")).unwrap();
        let raw = archive.store().get(CASES_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value[0]["result"]["legal_ground"]["section"].is_string());
        assert!(value[0]["result"]["precedent"]["strength_score"].is_number());
        assert!(value[0]["timestamp"].is_i64());
    }
}
