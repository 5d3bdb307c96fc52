use crate::core::budget::BudgetProfile;
use crate::core::config::AppConfig;
use crate::core::goal::Goal;
use crate::core::provider::{BudgetProvider, GoalProvider, PaymentRecorder};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Serves goals and budget straight from the YAML configuration.
///
/// Payments update the in-memory config and, when the config came from a
/// file, write it back.
pub struct ConfigProvider {
    config: RwLock<AppConfig>,
    path: Option<PathBuf>,
}

impl ConfigProvider {
    pub fn new(config: AppConfig, path: Option<PathBuf>) -> Self {
        Self {
            config: RwLock::new(config),
            path,
        }
    }

    pub async fn snapshot(&self) -> AppConfig {
        self.config.read().await.clone()
    }
}

#[async_trait]
impl GoalProvider for ConfigProvider {
    async fn fetch_goals(&self, active_only: bool) -> Result<Vec<Goal>> {
        let config = self.config.read().await;
        let mut goals: Vec<Goal> = config
            .goals
            .iter()
            .filter(|g| !active_only || g.is_active)
            .cloned()
            .collect();
        goals.sort_by_key(|g| g.priority);
        debug!(count = goals.len(), "Fetched goals from config");
        Ok(goals)
    }
}

#[async_trait]
impl BudgetProvider for ConfigProvider {
    async fn fetch_budget(&self) -> Result<BudgetProfile> {
        Ok(self.config.read().await.budget.profile())
    }
}

#[async_trait]
impl PaymentRecorder for ConfigProvider {
    async fn record_payment(&self, goal_name: &str, amount: f64) -> Result<Goal> {
        let mut config = self.config.write().await;
        let mut staged = config.clone();
        let goal = staged
            .find_goal_mut(goal_name)
            .ok_or_else(|| anyhow!("Goal not found: {}", goal_name))?;
        goal.apply_payment(amount)?;
        let updated = goal.clone();

        if let Some(path) = &self.path {
            staged.save_to_path(path)?;
        }
        *config = staged;
        info!(goal = %updated.name, amount, "Recorded payment");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::goal::GoalType;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.budget.monthly_income = 50000.0;
        config.goals = vec![
            Goal::new("Phone", GoalType::Purchase, 30000.0).with_priority(3),
            Goal::new("Card", GoalType::Payoff, 20000.0).with_priority(1),
            Goal {
                is_active: false,
                ..Goal::new("Old", GoalType::Savings, 1000.0).with_priority(2)
            },
        ];
        config
    }

    #[tokio::test]
    async fn test_fetch_goals_sorted_and_filtered() {
        let provider = ConfigProvider::new(config(), None);

        let active = provider.fetch_goals(true).await.unwrap();
        let names: Vec<&str> = active.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Card", "Phone"]);

        let all = provider.fetch_goals(false).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].name, "Old");
    }

    #[tokio::test]
    async fn test_record_payment_updates_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        config().save_to_path(&path).unwrap();

        let provider = ConfigProvider::new(config(), Some(path.clone()));
        let updated = provider.record_payment("card", 5000.0).await.unwrap();
        assert_eq!(updated.name, "Card");
        assert_eq!(updated.current_amount, 5000.0);

        let reloaded = AppConfig::load_from_path(&path).unwrap();
        let card = reloaded.goals.iter().find(|g| g.name == "Card").unwrap();
        assert_eq!(card.current_amount, 5000.0);
    }

    #[tokio::test]
    async fn test_record_payment_rejects_unknown_goal_and_bad_amount() {
        let provider = ConfigProvider::new(config(), None);

        let err = provider.record_payment("Vacation", 100.0).await.unwrap_err();
        assert!(err.to_string().contains("Goal not found"));

        assert!(provider.record_payment("Card", -5.0).await.is_err());
        assert_eq!(provider.snapshot().await.goals[1].current_amount, 0.0);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_goal_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.yaml");

        let provider = ConfigProvider::new(config(), Some(path));
        assert!(provider.record_payment("Card", 5000.0).await.is_err());

        let card = provider.snapshot().await.goals[1].clone();
        assert_eq!(card.name, "Card");
        assert_eq!(card.current_amount, 0.0);
    }
}
