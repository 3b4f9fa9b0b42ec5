use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::deposit::DepositId;

/// Per-recipient view of the deposit history.
///
/// `all` is append-only in creation order. `active` is kept ordered by id,
/// which is also creation order since ids are monotonic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientIndex {
    all: Vec<DepositId>,
    active: BTreeSet<DepositId>,
}

impl RecipientIndex {
    pub(crate) fn record(&mut self, id: DepositId) {
        self.all.push(id);
        self.active.insert(id);
    }

    /// Drops `id` from the active set. Returns `false` if it was not there.
    pub(crate) fn deactivate(&mut self, id: DepositId) -> bool {
        self.active.remove(&id)
    }

    pub fn all(&self) -> &[DepositId] {
        &self.all
    }

    pub fn active(&self) -> impl Iterator<Item = DepositId> + '_ {
        self.active.iter().copied()
    }

    pub fn is_active(&self, id: DepositId) -> bool {
        self.active.contains(&id)
    }

    pub fn total(&self) -> u64 {
        self.all.len() as u64
    }

    pub fn total_active(&self) -> u64 {
        self.active.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_keeps_history() {
        let mut index = RecipientIndex::default();
        for id in [0, 2, 4] {
            index.record(id);
        }

        assert!(index.deactivate(2));
        assert!(!index.deactivate(2));

        assert_eq!(index.all(), &[0, 2, 4]);
        assert_eq!(index.active().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(index.total(), 3);
        assert_eq!(index.total_active(), 2);
        assert!(!index.is_active(2));
    }
}
