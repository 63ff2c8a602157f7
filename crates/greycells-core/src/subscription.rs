#![forbid(unsafe_code)]

//! Subscription system for recurring event sources.
//!
//! The model declares which recurring sources should be running (today only
//! fixed-period timers). After every update the host calls
//! [`SubscriptionSet::reconcile`] with the declared set and gets back which
//! ones to start and which to stop, so no timer outlives the state that
//! asked for it.
//!
//! # How it works
//!
//! 1. `Site::subscriptions()` returns the active subscriptions
//! 2. The host reconciles them against what is already running
//! 3. New ids are started, ids that disappeared are stopped
//! 4. Messages produced by a subscription go through `Site::update()`

use core::time::Duration;
use std::collections::HashSet;

/// A unique identifier for a subscription.
pub type SubId = u64;

/// A recurring message source.
#[derive(Debug, Clone, PartialEq)]
pub enum Subscription<M> {
    /// Deliver `message` every `period`, first delivery one period from start.
    Every {
        id: SubId,
        period: Duration,
        message: M,
    },
}

impl<M> Subscription<M> {
    #[must_use]
    pub const fn id(&self) -> SubId {
        match self {
            Self::Every { id, .. } => *id,
        }
    }
}

/// Outcome of one reconcile pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDiff<M> {
    pub start: Vec<Subscription<M>>,
    pub stop: Vec<SubId>,
}

impl<M> SubscriptionDiff<M> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.stop.is_empty()
    }
}

/// Ids of the subscriptions the host currently runs.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionSet {
    active: Vec<SubId>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the set of active subscriptions.
    ///
    /// - Starts subscriptions whose id is not running yet
    /// - Stops running ids that are no longer declared
    /// - Leaves unchanged subscriptions running
    pub fn reconcile<M>(&mut self, declared: Vec<Subscription<M>>) -> SubscriptionDiff<M> {
        let declared_ids: HashSet<SubId> = declared.iter().map(Subscription::id).collect();

        let mut stop = Vec::new();
        self.active.retain(|id| {
            let keep = declared_ids.contains(id);
            if !keep {
                tracing::debug!(sub_id = *id, "stopping subscription");
                stop.push(*id);
            }
            keep
        });

        let mut start = Vec::new();
        for sub in declared {
            let id = sub.id();
            if !self.active.contains(&id) {
                tracing::debug!(sub_id = id, "starting subscription");
                self.active.push(id);
                start.push(sub);
            }
        }

        SubscriptionDiff { start, stop }
    }

    /// Stop everything, e.g. on teardown.
    pub fn stop_all(&mut self) -> Vec<SubId> {
        std::mem::take(&mut self.active)
    }

    #[must_use]
    pub fn active_ids(&self) -> &[SubId] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every(id: SubId) -> Subscription<&'static str> {
        Subscription::Every {
            id,
            period: Duration::from_secs(1),
            message: "tick",
        }
    }

    #[test]
    fn starts_new_subscriptions() {
        let mut set = SubscriptionSet::new();
        let diff = set.reconcile(vec![every(1), every(2)]);
        assert_eq!(diff.start.len(), 2);
        assert!(diff.stop.is_empty());
        assert_eq!(set.active_ids(), &[1, 2]);
    }

    #[test]
    fn unchanged_subscriptions_keep_running() {
        let mut set = SubscriptionSet::new();
        set.reconcile(vec![every(1)]);
        let diff = set.reconcile(vec![every(1)]);
        assert!(diff.is_empty());
    }

    #[test]
    fn removed_subscriptions_stop() {
        let mut set = SubscriptionSet::new();
        set.reconcile(vec![every(1), every(2)]);
        let diff = set.reconcile(vec![every(2)]);
        assert_eq!(diff.stop, vec![1]);
        assert!(diff.start.is_empty());
    }

    #[test]
    fn stop_all_clears() {
        let mut set = SubscriptionSet::new();
        set.reconcile(vec![every(5)]);
        assert_eq!(set.stop_all(), vec![5]);
        assert!(set.active_ids().is_empty());
    }

    #[test]
    fn duplicate_ids_start_once() {
        let mut set = SubscriptionSet::new();
        let diff = set.reconcile(vec![every(3), every(3)]);
        assert_eq!(diff.start.len(), 1);
    }
}
