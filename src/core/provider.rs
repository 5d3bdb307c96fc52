use crate::core::budget::BudgetProfile;
use crate::core::goal::Goal;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GoalProvider: Send + Sync {
    /// Goals in ascending priority order. Inactive goals are left out when
    /// `active_only` is set.
    async fn fetch_goals(&self, active_only: bool) -> Result<Vec<Goal>>;
}

#[async_trait]
pub trait BudgetProvider: Send + Sync {
    async fn fetch_budget(&self) -> Result<BudgetProfile>;
}

#[async_trait]
pub trait PaymentRecorder: Send + Sync {
    /// Adds `amount` to the named goal's progress and returns the updated goal.
    async fn record_payment(&self, goal_name: &str, amount: f64) -> Result<Goal>;
}
