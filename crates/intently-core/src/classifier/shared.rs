//! Copy-on-write handle to the live classifier bank.
//!
//! Requests take an `Arc` snapshot of the bank once and use it for their
//! whole extraction round. A retrain builds a complete new bank off to the
//! side and swaps the pointer, so concurrent readers see either the old bank
//! or the new one, never a mix.

use std::sync::{Arc, PoisonError, RwLock};

use super::ClassifierBank;

/// Shared, atomically replaceable reference to a [`ClassifierBank`].
///
/// Cloning the handle shares the same slot.
#[derive(Debug, Clone)]
pub struct SharedBank {
    slot: Arc<RwLock<Arc<ClassifierBank>>>,
}

impl SharedBank {
    pub fn new(bank: ClassifierBank) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Arc::new(bank))),
        }
    }

    /// The bank currently in service.
    ///
    /// The lock is held only long enough to clone the `Arc`.
    pub fn snapshot(&self) -> Arc<ClassifierBank> {
        let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Install a new bank, returning the one it replaced.
    pub fn replace(&self, bank: ClassifierBank) -> Arc<ClassifierBank> {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(bank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intently_types::classification::{ClassifierFamily, ClassifierVerdict};
    use intently_types::error::ClassifierError;

    fn bank_with(label: &'static str) -> ClassifierBank {
        ClassifierBank::new(ClassifierFamily::NaiveBayes).with_classifier(
            "topic",
            label,
            move |_: &str| -> Result<ClassifierVerdict, ClassifierError> {
                Ok(ClassifierVerdict::new(label, 1.0))
            },
        )
    }

    #[test]
    fn snapshot_survives_replace() {
        let shared = SharedBank::new(bank_with("old"));
        let before = shared.snapshot();

        let replaced = shared.replace(bank_with("new"));

        assert_eq!(before.labels("topic"), vec!["old"]);
        assert_eq!(replaced.labels("topic"), vec!["old"]);
        assert_eq!(shared.snapshot().labels("topic"), vec!["new"]);
    }

    #[test]
    fn clones_share_the_same_slot() {
        let shared = SharedBank::new(bank_with("old"));
        let other = shared.clone();

        other.replace(bank_with("new"));

        assert_eq!(shared.snapshot().labels("topic"), vec!["new"]);
    }
}
