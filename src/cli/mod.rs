pub mod budget;
pub mod deadline;
pub mod milestones;
pub mod pay;
pub mod plan;
pub mod setup;
pub mod simulate;
pub mod ui;

use crate::core::allocation::AllocationEngine;
use crate::core::budget::BudgetProfile;
use crate::core::goal::Goal;
use crate::providers::Sources;
use anyhow::{Context, Result};
use tracing::debug;

/// Goals and budget for one planning run.
pub struct PlanInputs {
    pub goals: Vec<Goal>,
    pub budget: BudgetProfile,
}

impl PlanInputs {
    pub fn engine(&self, currency_symbol: &str) -> AllocationEngine {
        AllocationEngine::new(&self.budget.snapshot()).with_currency_symbol(currency_symbol)
    }
}

/// Fetches active goals and the budget concurrently behind a spinner.
pub async fn load_plan_inputs(sources: &Sources) -> Result<PlanInputs> {
    let spinner = ui::new_spinner("Fetching goals and budget...");
    let result = futures::try_join!(
        sources.goals.fetch_goals(true),
        sources.budget.fetch_budget()
    );
    spinner.finish_and_clear();

    let (goals, budget) = result.context("Failed to load goals and budget")?;
    debug!(
        goals = goals.len(),
        income = budget.monthly_income,
        bills = budget.total_fixed_bills,
        "Loaded plan inputs"
    );
    Ok(PlanInputs { goals, budget })
}
