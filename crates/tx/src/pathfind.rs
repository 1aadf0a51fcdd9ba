//! Payment path search.
//!
//! The engine does not search for paths itself. A [`PathFinder`] proposes
//! candidate paths and the Payment handler checks each one against the
//! staged ledger before using it.

use std::collections::{BTreeSet, VecDeque};

use newcoin_common::config::PathConfig;
use newcoin_common::AccountId;
use newcoin_ledger::{index, Amount, Ledger, RippleState};
use tracing::debug;

use crate::directory::committed_dir_entries;
use crate::frame::Path;

/// Proposes payment paths.
pub trait PathFinder: Send + Sync {
    /// Candidate paths from `source` to `destination` for `amount`, best
    /// first. Paths list intermediaries only.
    fn find_paths(
        &self,
        ledger: &Ledger,
        source: &AccountId,
        destination: &AccountId,
        amount: &Amount,
    ) -> Vec<Path>;
}

/// Never proposes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPathFinder;

impl PathFinder for NoPathFinder {
    fn find_paths(&self, _: &Ledger, _: &AccountId, _: &AccountId, _: &Amount) -> Vec<Path> {
        Vec::new()
    }
}

/// Breadth-first search over trust lines in the amount's currency.
///
/// Neighbours are visited in owner-directory order, so the result depends
/// only on ledger contents. Capacity is not considered here.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustGraphPathFinder {
    limits: PathConfig,
}

impl TrustGraphPathFinder {
    pub fn new(limits: PathConfig) -> Self {
        Self { limits }
    }

    fn neighbours(&self, ledger: &Ledger, account: &AccountId, amount: &Amount) -> Vec<AccountId> {
        committed_dir_entries(ledger, &index::owner_dir(account))
            .iter()
            .filter_map(|entry| ledger.get_as::<RippleState>(entry).ok().flatten())
            .filter(|line| line.currency == amount.currency && line.involves(account))
            .map(|line| line.counterparty(account))
            .collect()
    }
}

impl PathFinder for TrustGraphPathFinder {
    fn find_paths(
        &self,
        ledger: &Ledger,
        source: &AccountId,
        destination: &AccountId,
        amount: &Amount,
    ) -> Vec<Path> {
        let mut found = Vec::new();
        if amount.is_native() || source == destination || self.limits.max_paths == 0 {
            return found;
        }

        // Each queued route starts at the source; the destination is implied.
        let mut queue = VecDeque::from([vec![*source]]);
        let mut expanded = BTreeSet::new();
        while let Some(route) = queue.pop_front() {
            let Some(&last) = route.last() else {
                continue;
            };
            if !expanded.insert(last) {
                continue;
            }
            for next in self.neighbours(ledger, &last, amount) {
                if next == *destination {
                    if route.len() > 1 {
                        found.push(route[1..].to_vec());
                        if found.len() == self.limits.max_paths {
                            debug!(paths = found.len(), "Path search hit its cap");
                            return found;
                        }
                    }
                    continue;
                }
                // +2 accounts for `next` and the destination.
                if route.contains(&next) || route.len() + 2 > self.limits.max_path_length {
                    continue;
                }
                let mut longer = route.clone();
                longer.push(next);
                queue.push_back(longer);
            }
        }
        found
    }
}
