//! Session upload ledger and save-time reconciliation.
//!
//! Slots only hold a URL and caption string; the ledger keeps the full upload
//! descriptor for each slot so backend metadata survives a save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ImageRecord, UploadedFile};
use crate::slots::{Slot, SlotId};

/// One uploaded (or pre-existing) file, tied to the slot showing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub slot: SlotId,
    pub file: UploadedFile,
    pub caption: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A listed slot that produced no record on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationMiss {
    /// No ledger entry for this slot (e.g. upload still in flight)
    NoEntry { slot: SlotId },
    /// URL text was edited away from the uploaded file's URL
    UrlMismatch {
        slot: SlotId,
        expected: String,
        found: String,
    },
}

/// Append-only record of files known to this editing session.
///
/// Entries for removed slots are never matched again but are kept for the
/// lifetime of the ledger.
#[derive(Debug, Clone, Default)]
pub struct UploadLedger {
    entries: Vec<LedgerEntry>,
}

impl UploadLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a file for `slot`.
    pub fn append(&mut self, slot: SlotId, file: UploadedFile, caption: Option<String>) {
        debug!("Ledger: recorded {} for slot {}", file.url, slot);
        self.entries.push(LedgerEntry {
            slot,
            file,
            caption,
            recorded_at: Utc::now(),
        });
    }

    pub fn find_by_slot(&self, slot: SlotId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.slot == slot)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge the listed slots with the ledger into persisted records.
    ///
    /// A slot yields a record when the ledger holds an entry for its id and
    /// the slot's URL text still equals the entry's file URL. The record
    /// takes the entry's file and the slot's caption. Output follows slot order; the ledger is not modified.
    pub fn reconcile<'a, I>(&self, slots: I) -> (Vec<ImageRecord>, Vec<ReconciliationMiss>)
    where
        I: IntoIterator<Item = &'a Slot>,
    {
        let mut records = Vec::new();
        let mut misses = Vec::new();

        for slot in slots {
            let Some(entry) = self.find_by_slot(slot.id()) else {
                debug!("Reconcile: no ledger entry for slot {}", slot.id());
                misses.push(ReconciliationMiss::NoEntry { slot: slot.id() });
                continue;
            };

            if entry.file.url != slot.url_text() {
                debug!(
                    "Reconcile: slot {} URL '{}' no longer matches '{}'",
                    slot.id(),
                    slot.url_text(),
                    entry.file.url
                );
                misses.push(ReconciliationMiss::UrlMismatch {
                    slot: slot.id(),
                    expected: entry.file.url.clone(),
                    found: slot.url_text().to_string(),
                });
                continue;
            }

            let caption = slot.caption().map(str::to_string);
            records.push(ImageRecord::new(entry.file.clone(), caption));
        }

        (records, misses)
    }
}
