//! Budget snapshot and the needs/wants/savings/extra split

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NEEDS_PCT: f64 = 40.0;
pub const DEFAULT_WANTS_PCT: f64 = 20.0;
pub const DEFAULT_SAVINGS_PCT: f64 = 15.0;
/// Share of the available budget earmarked for goals.
pub const DEFAULT_EXTRA_PCT: f64 = 25.0;

/// Financial figures the allocation engine is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub monthly_income: f64,
    pub total_fixed_bills: f64,
    pub discretionary_pct: f64,
}

impl BudgetSnapshot {
    pub fn new(monthly_income: f64, total_fixed_bills: f64) -> Self {
        Self {
            monthly_income,
            total_fixed_bills,
            discretionary_pct: DEFAULT_EXTRA_PCT,
        }
    }

    pub fn with_discretionary_pct(mut self, pct: f64) -> Self {
        self.discretionary_pct = pct;
        self
    }

    /// Income left after fixed bills, clamped at zero.
    pub fn available(&self) -> f64 {
        (self.monthly_income - self.total_fixed_bills).max(0.0)
    }

    /// Monthly pool available to goals.
    pub fn extra_pool(&self) -> f64 {
        let pct = self.discretionary_pct.clamp(0.0, 100.0);
        self.available() * pct / 100.0
    }
}

/// Percentages of the available budget assigned to each spending bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSplit {
    #[serde(default = "default_needs_pct")]
    pub needs_pct: f64,
    #[serde(default = "default_wants_pct")]
    pub wants_pct: f64,
    #[serde(default = "default_savings_pct")]
    pub savings_pct: f64,
    #[serde(default = "default_extra_pct")]
    pub extra_pct: f64,
}

fn default_needs_pct() -> f64 {
    DEFAULT_NEEDS_PCT
}

fn default_wants_pct() -> f64 {
    DEFAULT_WANTS_PCT
}

fn default_savings_pct() -> f64 {
    DEFAULT_SAVINGS_PCT
}

fn default_extra_pct() -> f64 {
    DEFAULT_EXTRA_PCT
}

impl Default for BudgetSplit {
    fn default() -> Self {
        Self {
            needs_pct: DEFAULT_NEEDS_PCT,
            wants_pct: DEFAULT_WANTS_PCT,
            savings_pct: DEFAULT_SAVINGS_PCT,
            extra_pct: DEFAULT_EXTRA_PCT,
        }
    }
}

/// Monthly amounts per spending bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryBudgets {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
    pub extra: f64,
}

impl BudgetSplit {
    pub fn validate(&self) -> Result<()> {
        let parts = [
            ("needs", self.needs_pct),
            ("wants", self.wants_pct),
            ("savings", self.savings_pct),
            ("extra", self.extra_pct),
        ];
        for (label, pct) in parts {
            if !(0.0..=100.0).contains(&pct) {
                bail!("The {label} percentage must be between 0 and 100, got {pct}");
            }
        }
        let total: f64 = parts.iter().map(|(_, pct)| pct).sum();
        if (total - 100.0).abs() > 1e-9 {
            bail!("Budget split must add up to 100%, got {total}%");
        }
        Ok(())
    }

    pub fn apply(&self, available: f64) -> CategoryBudgets {
        let available = available.max(0.0);
        CategoryBudgets {
            needs: available * self.needs_pct / 100.0,
            wants: available * self.wants_pct / 100.0,
            savings: available * self.savings_pct / 100.0,
            extra: available * self.extra_pct / 100.0,
        }
    }
}

/// Everything a budget provider knows about a user's month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetProfile {
    pub monthly_income: f64,
    pub total_fixed_bills: f64,
    #[serde(default)]
    pub split: BudgetSplit,
}

impl BudgetProfile {
    pub fn snapshot(&self) -> BudgetSnapshot {
        BudgetSnapshot::new(self.monthly_income, self.total_fixed_bills)
            .with_discretionary_pct(self.split.extra_pct)
    }

    pub fn category_budgets(&self) -> CategoryBudgets {
        self.split.apply(self.snapshot().available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_pool_from_available_budget() {
        let snapshot = BudgetSnapshot::new(50000.0, 20000.0);
        assert_eq!(snapshot.discretionary_pct, 25.0);
        assert_eq!(snapshot.available(), 30000.0);
        assert_eq!(snapshot.extra_pool(), 7500.0);
    }

    #[test]
    fn test_extra_pool_clamps_when_bills_exceed_income() {
        let snapshot = BudgetSnapshot::new(10000.0, 15000.0);
        assert_eq!(snapshot.available(), 0.0);
        assert_eq!(snapshot.extra_pool(), 0.0);
    }

    #[test]
    fn test_discretionary_pct_is_bounded() {
        let snapshot = BudgetSnapshot::new(1000.0, 0.0).with_discretionary_pct(150.0);
        assert_eq!(snapshot.extra_pool(), 1000.0);
        let snapshot = snapshot.with_discretionary_pct(-5.0);
        assert_eq!(snapshot.extra_pool(), 0.0);
    }

    #[test]
    fn test_default_split_is_valid() {
        let split = BudgetSplit::default();
        assert!(split.validate().is_ok());
        assert_eq!(split.needs_pct, 40.0);
        assert_eq!(split.wants_pct, 20.0);
        assert_eq!(split.savings_pct, 15.0);
        assert_eq!(split.extra_pct, 25.0);
    }

    #[test]
    fn test_split_must_add_up() {
        let split = BudgetSplit {
            needs_pct: 50.0,
            wants_pct: 30.0,
            savings_pct: 20.0,
            extra_pct: 10.0,
        };
        let err = split.validate().unwrap_err();
        assert!(err.to_string().contains("add up to 100%"));

        let negative = BudgetSplit {
            needs_pct: 110.0,
            wants_pct: -10.0,
            savings_pct: 0.0,
            extra_pct: 0.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_partial_split_uses_field_defaults() {
        let split: BudgetSplit = serde_yaml::from_str("needs_pct: 50\nwants_pct: 10").unwrap();
        assert_eq!(split.needs_pct, 50.0);
        assert_eq!(split.wants_pct, 10.0);
        assert_eq!(split.savings_pct, DEFAULT_SAVINGS_PCT);
        assert_eq!(split.extra_pct, DEFAULT_EXTRA_PCT);
    }

    #[test]
    fn test_profile_category_budgets() {
        let profile = BudgetProfile {
            monthly_income: 50000.0,
            total_fixed_bills: 10000.0,
            split: BudgetSplit::default(),
        };
        let budgets = profile.category_budgets();
        assert_eq!(budgets.needs, 16000.0);
        assert_eq!(budgets.wants, 8000.0);
        assert_eq!(budgets.savings, 6000.0);
        assert_eq!(budgets.extra, 10000.0);
        assert_eq!(profile.snapshot().extra_pool(), budgets.extra);
    }
}
