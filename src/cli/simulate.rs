use super::load_plan_inputs;
use super::plan::allocation_table;
use super::ui::{
    StyleType, change_cell, header_cell, money_cell, months_cell, new_styled_table, style_text,
};
use crate::core::allocation::{MonthsToGoal, SimulationResult, Suggestion};
use crate::core::goal::Goal;
use crate::core::money::format_currency;
use crate::providers::Sources;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use tracing::info;

/// Renders the before/after comparison for a proposed goal.
pub fn render_simulation(simulation: &SimulationResult, new_goal: &Goal, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&style_text(
        &format!("What if you add {}?", new_goal.name),
        StyleType::Title,
    ));
    out.push('\n');

    out.push_str(&format!(
        "{} {} of {} allocated, {} unallocated\n",
        style_text("Before:", StyleType::TotalLabel),
        format_currency(simulation.before.total_monthly(), symbol),
        format_currency(simulation.before.extra_pool, symbol),
        format_currency(simulation.before.unallocated, symbol),
    ));
    out.push_str(&format!(
        "{} {} of {} allocated, {} unallocated\n",
        style_text("After:", StyleType::TotalLabel),
        format_currency(simulation.after.total_monthly(), symbol),
        format_currency(simulation.after.extra_pool, symbol),
        format_currency(simulation.after.unallocated, symbol),
    ));

    match &simulation.new_goal_allocation {
        Some(allocation) => {
            let timeline = match allocation.months_to_goal {
                MonthsToGoal::Months(m) => format!("done in {m:.1} months"),
                MonthsToGoal::Never => "never completes".to_string(),
            };
            out.push_str(&format!(
                "{} would get {}/month ({timeline})\n",
                new_goal.name,
                style_text(&format_currency(allocation.monthly, symbol), StyleType::TotalValue),
            ));
        }
        None => out.push_str(&style_text(
            &format!("{} is inactive and would not be funded.\n", new_goal.name),
            StyleType::Subtle,
        )),
    }

    if simulation.impact.is_empty() {
        out.push_str(&style_text("No existing goal is affected.", StyleType::Subtle));
        out.push('\n');
    } else {
        let mut table = new_styled_table();
        table.set_header(vec![
            header_cell("Goal"),
            header_cell("Monthly before"),
            header_cell("Monthly after"),
            header_cell("Change"),
            header_cell("Months before"),
            header_cell("Months after"),
        ]);
        for impact in &simulation.impact {
            table.add_row(vec![
                Cell::new(&impact.name),
                money_cell(impact.monthly_before, symbol),
                money_cell(impact.monthly_after, symbol),
                change_cell(impact.monthly_change(), symbol),
                months_cell(impact.months_before),
                months_cell(impact.months_after),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    out.push_str(&allocation_table(&simulation.after, symbol).to_string());
    out.push('\n');

    if let Some(warning) = &simulation.after.warning {
        out.push_str(&style_text(&format!("Warning: {warning}"), StyleType::Warning));
        out.push('\n');
    }
    out
}

/// Renders reallocation suggestions: a table of reductions, then any remaining note.
pub fn render_suggestions(suggestions: &[Suggestion], new_goal: &Goal, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&style_text(
        &format!("Making room for {}", new_goal.name),
        StyleType::Title,
    ));
    out.push('\n');

    let reductions: Vec<_> = suggestions
        .iter()
        .filter_map(|s| match s {
            Suggestion::Reduce(r) => Some(r),
            _ => None,
        })
        .collect();

    if !reductions.is_empty() {
        let mut table = new_styled_table();
        table.set_header(vec![
            header_cell("Reduce"),
            header_cell("Current"),
            header_cell("Suggested"),
            header_cell("Frees"),
            header_cell("Delay (months)"),
        ]);
        for r in &reductions {
            let delay = if r.delay_months.is_finite() {
                format!("+{:.1}", r.delay_months)
            } else {
                "never".to_string()
            };
            table.add_row(vec![
                Cell::new(&r.goal_name),
                money_cell(r.current_monthly, symbol),
                money_cell(r.suggested_monthly, symbol),
                money_cell(r.freed, symbol),
                Cell::new(delay).set_alignment(CellAlignment::Right),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    for suggestion in suggestions {
        match suggestion {
            Suggestion::Fits { message } => {
                out.push_str(&style_text(message, StyleType::TotalValue));
                out.push('\n');
            }
            Suggestion::Shortfall { message, .. } => {
                out.push_str(&style_text(message, StyleType::Warning));
                out.push('\n');
            }
            Suggestion::Reduce(_) => {}
        }
    }
    out
}

pub async fn run_simulate(sources: &Sources, new_goal: &Goal, symbol: &str) -> Result<()> {
    let inputs = load_plan_inputs(sources).await?;
    let simulation = inputs
        .engine(symbol)
        .simulate_new_goal(&inputs.goals, new_goal);
    info!(
        goal = %new_goal.name,
        impacted = simulation.impact.len(),
        "Simulated new goal"
    );
    print!("{}", render_simulation(&simulation, new_goal, symbol));
    Ok(())
}

pub async fn run_rebalance(sources: &Sources, new_goal: &Goal, symbol: &str) -> Result<()> {
    let inputs = load_plan_inputs(sources).await?;
    let suggestions = inputs
        .engine(symbol)
        .suggest_reallocation(&inputs.goals, new_goal);
    info!(
        goal = %new_goal.name,
        suggestions = suggestions.len(),
        "Computed reallocation"
    );
    print!("{}", render_suggestions(&suggestions, new_goal, symbol));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::allocation::AllocationEngine;
    use crate::core::budget::BudgetSnapshot;
    use crate::core::goal::GoalType;

    fn engine() -> AllocationEngine {
        AllocationEngine::new(&BudgetSnapshot::new(50000.0, 20000.0))
    }

    fn existing() -> Vec<Goal> {
        vec![
            Goal::new("Motorcycle", GoalType::Payoff, 60000.0)
                .with_priority(1)
                .with_monthly_contribution(6000.0),
            Goal::new("Vacation", GoalType::Savings, 20000.0)
                .with_priority(4)
                .with_monthly_contribution(1000.0),
        ]
    }

    #[test]
    fn test_render_simulation_lists_impact() {
        let new_goal = Goal::new("Laptop", GoalType::Purchase, 40000.0)
            .with_priority(2)
            .with_monthly_contribution(1200.0);
        let simulation = engine().simulate_new_goal(&existing(), &new_goal);

        let rendered =
            console::strip_ansi_codes(&render_simulation(&simulation, &new_goal, "₱")).to_string();
        assert!(rendered.contains("What if you add Laptop?"));
        assert!(rendered.contains("Laptop would get ₱1,200.00/month"));
        assert!(rendered.contains("Vacation"));
        assert!(rendered.contains("-₱700.00"));
    }

    #[test]
    fn test_render_suggestions() {
        let new_goal = Goal::new("Laptop", GoalType::Purchase, 40000.0)
            .with_priority(2)
            .with_monthly_contribution(2000.0);
        let suggestions = engine().suggest_reallocation(&existing(), &new_goal);

        let rendered =
            console::strip_ansi_codes(&render_suggestions(&suggestions, &new_goal, "₱"))
                .to_string();
        assert!(rendered.contains("Making room for Laptop"));
        assert!(rendered.contains("Vacation"));
        assert!(rendered.contains("₱700.00"));
        assert!(rendered.contains("Still short ₱200.00/month"));
    }

    #[test]
    fn test_render_suggestions_when_goal_fits() {
        let new_goal = Goal::new("Shoes", GoalType::Purchase, 3000.0)
            .with_priority(5)
            .with_monthly_contribution(500.0);
        let suggestions = engine().suggest_reallocation(&existing(), &new_goal);

        let rendered =
            console::strip_ansi_codes(&render_suggestions(&suggestions, &new_goal, "₱"))
                .to_string();
        assert!(rendered.contains("fits within current budget"));
    }
}
