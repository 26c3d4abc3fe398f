use indexmap::map::Entry;
use indexmap::IndexMap;
use ledgerlens_core::{LedgerKey, ParseDiagnostics, SectionKind, Transaction, TransactionCandidate};

/// Collapses candidates from both statement layouts into one canonical
/// transaction per `(date, signed cents)`.
///
/// By-date candidates create records (first seen wins). By-type candidates
/// only rewrite the description of an existing record; they never create
/// one, since they carry no balance.
#[derive(Debug, Default)]
pub struct Reconciler {
    ledger: IndexMap<LedgerKey, Transaction>,
    duplicates_dropped: usize,
    descriptions_merged: usize,
    orphans_discarded: usize,
    unkeyable: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a by-date candidate unless its key is already present.
    pub fn insert(&mut self, candidate: TransactionCandidate) {
        let Some(key) = candidate.key() else {
            self.unkeyable += 1;
            return;
        };
        match self.ledger.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Transaction::from_candidate(candidate));
            }
            Entry::Occupied(slot) => {
                tracing::debug!(key = %slot.key(), "duplicate by-date line dropped");
                self.duplicates_dropped += 1;
            }
        }
    }

    /// Overwrite the description of the record sharing this candidate's key.
    pub fn merge(&mut self, candidate: &TransactionCandidate) {
        let Some(key) = candidate.key() else {
            self.unkeyable += 1;
            return;
        };
        match self.ledger.get_mut(&key) {
            Some(existing) => {
                existing.description = candidate.raw_description.clone();
                self.descriptions_merged += 1;
            }
            None => {
                tracing::debug!(%key, "by-type line has no by-date counterpart");
                self.orphans_discarded += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Ledger in insertion (statement) order; counters are added to `diag`.
    pub fn finish(self, diag: &mut ParseDiagnostics) -> Vec<Transaction> {
        diag.duplicates_dropped += self.duplicates_dropped;
        diag.descriptions_merged += self.descriptions_merged;
        diag.orphans_discarded += self.orphans_discarded;
        diag.malformed_numeric += self.unkeyable;
        self.ledger.into_values().collect()
    }
}

/// Reconcile candidates from any mix of sections. All by-date candidates are
/// applied before any by-type candidate, each group in its given order.
pub fn reconcile(
    candidates: impl IntoIterator<Item = TransactionCandidate>,
    diag: &mut ParseDiagnostics,
) -> Vec<Transaction> {
    let (by_date, by_type): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.source == SectionKind::ByDate);

    let mut reconciler = Reconciler::new();
    for candidate in by_date {
        reconciler.insert(candidate);
    }
    for candidate in &by_type {
        reconciler.merge(candidate);
    }
    reconciler.finish(diag)
}
