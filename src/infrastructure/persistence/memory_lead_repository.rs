//! In-memory implementation of the lead log.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::debug;

use crate::domain::entities::{Lead, LeadId, LeadSubmission};
use crate::domain::repositories::LeadRepository;

/// Bounded, insertion-ordered lead log held in process memory.
///
/// Appends and reads are serialized by a mutex held only for the in-memory
/// operation. Contents are lost on restart.
pub struct InMemoryLeadRepository {
    log: Mutex<LeadLog>,
    capacity: usize,
}

struct LeadLog {
    entries: VecDeque<Lead>,
    last_id: u64,
}

impl InMemoryLeadRepository {
    /// Number of leads retained when no capacity is configured.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates an empty log holding at most `capacity` leads (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!(capacity, "Lead log created");

        Self {
            log: Mutex::new(LeadLog {
                entries: VecDeque::with_capacity(capacity),
                last_id: 0,
            }),
            capacity,
        }
    }

    /// Locks the log, recovering the data if a previous holder panicked.
    fn lock(&self) -> MutexGuard<'_, LeadLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryLeadRepository {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn append(&self, submission: LeadSubmission) -> Lead {
        let mut log = self.lock();

        let received_at = Utc::now();
        let millis = u64::try_from(received_at.timestamp_millis()).unwrap_or_default();
        let id = millis.max(log.last_id + 1);
        log.last_id = id;

        let lead = Lead::new(LeadId::new(id), received_at, submission);
        log.entries.push_back(lead.clone());

        while log.entries.len() > self.capacity {
            if let Some(evicted) = log.entries.pop_front() {
                debug!(lead_id = %evicted.id, "Evicted oldest lead from log");
            }
        }

        lead
    }

    fn recent(&self, limit: usize) -> Vec<Lead> {
        self.lock().entries.iter().rev().take(limit).cloned().collect()
    }

    fn count(&self) -> usize {
        self.lock().entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn submission(n: usize) -> LeadSubmission {
        LeadSubmission::new(format!("Customer {n}"), format!("c{n}@example.com"), "555-0100")
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let repo = InMemoryLeadRepository::default();

        let first = repo.append(submission(1));
        let second = repo.append(submission(2));

        assert!(second.id > first.id);
        assert!(second.received_at >= first.received_at);
        assert_eq!(repo.count(), 2);
    }

    #[test]
    fn test_recent_is_most_recent_first() {
        let repo = InMemoryLeadRepository::default();
        for n in 1..=5 {
            repo.append(submission(n));
        }

        let recent = repo.recent(3);

        let names: Vec<&str> = recent.iter().map(|l| l.submission.name()).collect();
        assert_eq!(names, vec!["Customer 5", "Customer 4", "Customer 3"]);
    }

    #[test]
    fn test_recent_returns_everything_when_limit_exceeds_len() {
        let repo = InMemoryLeadRepository::default();
        repo.append(submission(1));

        assert_eq!(repo.recent(20).len(), 1);
        assert!(repo.recent(0).is_empty());
    }

    #[test]
    fn test_log_evicts_oldest_past_capacity() {
        let repo = InMemoryLeadRepository::default();
        for n in 1..=101 {
            repo.append(submission(n));
        }

        assert_eq!(repo.count(), 100);

        let all = repo.recent(usize::MAX);
        assert_eq!(all.first().unwrap().submission.name(), "Customer 101");
        assert_eq!(all.last().unwrap().submission.name(), "Customer 2");
        assert!(all.iter().all(|l| l.submission.name() != "Customer 1"));

        // Remaining entries keep their insertion order.
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let repo = InMemoryLeadRepository::new(0);
        repo.append(submission(1));
        repo.append(submission(2));

        assert_eq!(repo.capacity(), 1);
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.recent(5)[0].submission.name(), "Customer 2");
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let repo = Arc::new(InMemoryLeadRepository::new(1_000));

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let repo = Arc::clone(&repo);
                scope.spawn(move || {
                    for n in 0..50 {
                        repo.append(submission(worker * 100 + n));
                    }
                });
            }
        });

        assert_eq!(repo.count(), 400);

        let leads = repo.recent(usize::MAX);
        let ids: HashSet<LeadId> = leads.iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), 400);
        assert!(leads.windows(2).all(|w| w[0].id > w[1].id));
    }
}
