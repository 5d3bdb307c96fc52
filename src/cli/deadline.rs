use super::ui::{StyleType, style_text};
use crate::core::allocation::{AllocationEngine, DeadlinePlan};
use crate::core::goal::Goal;
use crate::core::money::format_currency;
use crate::providers::Sources;
use anyhow::{Result, anyhow};
use tracing::info;

/// Case-insensitive lookup by goal name.
pub fn find_goal<'a>(goals: &'a [Goal], name: &str) -> Option<&'a Goal> {
    let wanted = name.trim().to_lowercase();
    goals.iter().find(|g| g.name.to_lowercase() == wanted)
}

pub fn render_deadline(goal: &Goal, plan: &DeadlinePlan, extra_pool: f64, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&style_text(
        &format!("Deadline check: {}", goal.name),
        StyleType::Title,
    ));
    out.push('\n');
    out.push_str(&format!(
        "Remaining: {} of {}\n",
        format_currency(goal.remaining(), symbol),
        format_currency(goal.target_amount, symbol)
    ));
    if let Some(date) = &goal.target_date {
        out.push_str(&format!("Target date: {date}\n"));
    }
    out.push_str(&plan.message);
    out.push('\n');

    if plan.months_available.is_some() {
        out.push_str(&format!(
            "Extra pool: {}\n",
            format_currency(extra_pool, symbol)
        ));
        if plan.is_feasible {
            out.push_str(&style_text("Feasible within the extra pool.", StyleType::TotalValue));
        } else {
            out.push_str(&style_text(
                &format!(
                    "Not feasible: short by {}/month.",
                    format_currency(plan.shortfall, symbol)
                ),
                StyleType::Error,
            ));
        }
        out.push('\n');
    } else if !plan.is_feasible {
        out.push_str(&style_text(
            "Fix the target date (YYYY-MM-DD) to plan for it.",
            StyleType::Error,
        ));
        out.push('\n');
    }
    out
}

pub async fn run(sources: &Sources, goal_name: &str, symbol: &str) -> Result<()> {
    let (goals, budget) = futures::try_join!(
        sources.goals.fetch_goals(false),
        sources.budget.fetch_budget()
    )?;
    let goal =
        find_goal(&goals, goal_name).ok_or_else(|| anyhow!("Goal not found: {}", goal_name))?;

    let engine = AllocationEngine::new(&budget.snapshot()).with_currency_symbol(symbol);
    let plan = engine.optimize_for_deadline(goal);
    info!(
        goal = %goal.name,
        feasible = plan.is_feasible,
        required = plan.required_monthly,
        "Checked deadline"
    );
    print!("{}", render_deadline(goal, &plan, engine.extra_pool(), symbol));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::budget::BudgetSnapshot;
    use crate::core::goal::GoalType;
    use chrono::NaiveDate;

    fn engine() -> AllocationEngine {
        AllocationEngine::new(&BudgetSnapshot::new(50000.0, 20000.0))
            .with_today(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    #[test]
    fn test_find_goal_ignores_case() {
        let goals = vec![Goal::new("Car Loan", GoalType::Payoff, 1000.0)];
        assert!(find_goal(&goals, "car loan").is_some());
        assert!(find_goal(&goals, "boat").is_none());
    }

    #[test]
    fn test_render_infeasible_deadline() {
        let goal = Goal::new("Car", GoalType::Purchase, 60000.0).with_target_date("2027-04-18");
        let engine = engine();
        let plan = engine.optimize_for_deadline(&goal);

        let rendered =
            console::strip_ansi_codes(&render_deadline(&goal, &plan, engine.extra_pool(), "₱"))
                .to_string();
        assert!(rendered.contains("Need ₱10,000.00/month for 6 months"));
        assert!(rendered.contains("Not feasible: short by ₱2,500.00/month."));
    }

    #[test]
    fn test_render_invalid_deadline() {
        let goal = Goal::new("Car", GoalType::Purchase, 60000.0).with_target_date("soon");
        let engine = engine();
        let plan = engine.optimize_for_deadline(&goal);

        let rendered =
            console::strip_ansi_codes(&render_deadline(&goal, &plan, engine.extra_pool(), "₱"))
                .to_string();
        assert!(rendered.contains("Invalid target date"));
        assert!(rendered.contains("Fix the target date"));
    }
}
