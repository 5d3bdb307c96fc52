//! Progress milestones for payoff goals
use crate::core::cache::KeyValueCollection;
use crate::core::goal::{Goal, GoalType};
use crate::core::money::format_currency;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Percent-of-target marks worth celebrating, ascending.
pub const MILESTONES: [u32; 4] = [25, 50, 75, 100];

/// Highest milestone the goal has passed, if any.
///
/// Only active payoff goals with a positive target have milestones.
pub fn reached_milestone(goal: &Goal) -> Option<u32> {
    if !goal.is_active || goal.goal_type != GoalType::Payoff || goal.target_amount <= 0.0 {
        return None;
    }
    let progress = goal.progress_pct();
    MILESTONES
        .iter()
        .rev()
        .find(|m| progress >= f64::from(**m))
        .copied()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneEvent {
    pub goal_name: String,
    pub milestone: u32,
    pub current_amount: f64,
    pub target_amount: f64,
}

impl MilestoneEvent {
    pub fn message(&self, currency_symbol: &str) -> String {
        if self.milestone >= 100 {
            format!(
                "{} is fully paid off! {} of {} done.",
                self.goal_name,
                format_currency(self.current_amount, currency_symbol),
                format_currency(self.target_amount, currency_symbol)
            )
        } else {
            format!(
                "{}% of {} paid off: {} of {}. Keep going!",
                self.milestone,
                self.goal_name,
                format_currency(self.current_amount, currency_symbol),
                format_currency(self.target_amount, currency_symbol)
            )
        }
    }
}

/// Remembers the last milestone reported per goal so each one is reported once.
pub struct MilestoneTracker {
    collection: Arc<dyn KeyValueCollection>,
    scope: String,
}

impl MilestoneTracker {
    pub fn new(collection: Arc<dyn KeyValueCollection>, scope: impl Into<String>) -> Self {
        Self {
            collection,
            scope: scope.into(),
        }
    }

    fn key(&self, goal_name: &str) -> String {
        format!("{}:{}", self.scope, goal_name.to_lowercase())
    }

    async fn last_reported(&self, key: &str) -> u32 {
        match self.collection.get(key).await {
            Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                debug!(%key, error = %e, "Discarding unreadable milestone record");
                0
            }),
            None => 0,
        }
    }

    /// Returns milestones reached since the last check and records them.
    pub async fn check(&self, goals: &[Goal]) -> Vec<MilestoneEvent> {
        let mut events = Vec::new();
        for goal in goals {
            let Some(milestone) = reached_milestone(goal) else {
                continue;
            };
            let key = self.key(&goal.name);
            let last = self.last_reported(&key).await;
            if milestone <= last {
                continue;
            }
            debug!(goal = %goal.name, milestone, last, "New milestone reached");
            match serde_json::to_vec(&milestone) {
                Ok(bytes) => self.collection.put(&key, bytes).await,
                Err(e) => debug!(%key, error = %e, "Failed to encode milestone"),
            }
            events.push(MilestoneEvent {
                goal_name: goal.name.clone(),
                milestone,
                current_amount: goal.current_amount,
                target_amount: goal.target_amount,
            });
        }
        events
    }

    /// Forgets what was reported for a goal.
    pub async fn reset(&self, goal_name: &str) {
        self.collection.remove(&self.key(goal_name)).await;
    }
}
