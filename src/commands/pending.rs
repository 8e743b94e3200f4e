//! Per-user pending `/add` prompts with an idle timeout

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::ledger::{Category, EnteredAmount};

/// Where a multi-step `/add` currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum AddStep {
    AwaitingAmount,
    AwaitingCategory {
        amount: EnteredAmount,
    },
    AwaitingNote {
        amount: EnteredAmount,
        category: Category,
    },
    AwaitingConfirmation {
        amount: EnteredAmount,
        category: Category,
        note: Option<String>,
    },
}

struct Slot {
    step: AddStep,
    touched: Instant,
}

/// Mapping from user id to the in-progress `/add`.
///
/// A slot untouched for longer than the TTL behaves as if it was never
/// there; [`PendingInputs::cleanup`] drops such slots for good.
#[derive(Clone)]
pub struct PendingInputs {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
    ttl: Duration,
}

impl PendingInputs {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Current step for `user_id`, or `None` if absent or expired
    pub async fn get(&self, user_id: &str) -> Option<AddStep> {
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.get(user_id) {
            if slot.touched.elapsed() < self.ttl {
                return Some(slot.step.clone());
            }
            log::info!("Pending add for user {} expired", user_id);
            slots.remove(user_id);
        }
        None
    }

    /// Stores `step`, replacing any previous slot and resetting its timer
    pub async fn set(&self, user_id: &str, step: AddStep) {
        let mut slots = self.slots.lock().await;
        slots.insert(
            user_id.to_string(),
            Slot {
                step,
                touched: Instant::now(),
            },
        );
    }

    /// Clears the slot. Returns whether a live one was present.
    pub async fn clear(&self, user_id: &str) -> bool {
        let mut slots = self.slots.lock().await;
        match slots.remove(user_id) {
            Some(slot) => slot.touched.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Removes expired slots, returning how many were dropped
    pub async fn cleanup(&self) -> usize {
        let mut slots = self.slots.lock().await;
        let before = slots.len();
        slots.retain(|_, slot| slot.touched.elapsed() < self.ttl);
        before - slots.len()
    }

    /// Number of live slots
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.touched.elapsed() < self.ttl).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Spawns the periodic sweeper that drops expired slots.
pub fn spawn_cleanup_task(pending: PendingInputs, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = pending.cleanup().await;
            if removed > 0 {
                log::info!("Dropped {} expired add prompt(s)", removed);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_clear() {
        let pending = PendingInputs::new(Duration::from_secs(60));
        assert_eq!(pending.get("1").await, None);

        pending.set("1", AddStep::AwaitingAmount).await;
        assert_eq!(pending.get("1").await, Some(AddStep::AwaitingAmount));
        assert_eq!(pending.get("2").await, None);
        assert_eq!(pending.len().await, 1);

        assert!(pending.clear("1").await);
        assert!(!pending.clear("1").await);
        assert!(pending.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_slot_is_absent_and_swept() {
        let pending = PendingInputs::new(Duration::from_millis(30));
        pending.set("1", AddStep::AwaitingAmount).await;
        pending.set("2", AddStep::AwaitingAmount).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(pending.len().await, 0);
        assert_eq!(pending.get("1").await, None);
        assert_eq!(pending.cleanup().await, 1);
    }

    #[tokio::test]
    async fn test_set_resets_timer() {
        let pending = PendingInputs::new(Duration::from_millis(80));
        pending.set("1", AddStep::AwaitingAmount).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        pending.set("1", AddStep::AwaitingAmount).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(pending.get("1").await.is_some());
    }
}
