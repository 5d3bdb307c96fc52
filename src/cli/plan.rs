use super::load_plan_inputs;
use super::ui::{
    StyleType, format_optional_cell, header_cell, money_cell, months_cell, new_styled_table,
    style_text,
};
use crate::core::allocation::{AllocationResult, GoalAllocation};
use crate::core::money::format_currency;
use crate::providers::Sources;
use anyhow::Result;
use comfy_table::{Cell, Color, Table};
use tracing::info;

fn status_cell(allocation: &GoalAllocation) -> Cell {
    if allocation.complete {
        Cell::new("complete").fg(Color::Green)
    } else if allocation.months_to_goal.is_never() {
        Cell::new("unfunded").fg(Color::Red)
    } else {
        Cell::new("on track")
    }
}

pub(crate) fn allocation_table(result: &AllocationResult, symbol: &str) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Goal"),
        header_cell("Priority"),
        header_cell("Monthly"),
        header_cell("Months to goal"),
        header_cell("Remaining"),
        header_cell("Target date"),
        header_cell("Status"),
    ]);

    for allocation in &result.allocations {
        table.add_row(vec![
            Cell::new(&allocation.name),
            Cell::new(allocation.priority),
            money_cell(allocation.monthly, symbol),
            months_cell(allocation.months_to_goal),
            money_cell(allocation.remaining, symbol),
            format_optional_cell(allocation.target_date.as_ref(), |d| d.to_string()),
            status_cell(allocation),
        ]);
    }
    table
}

/// Renders an allocation plan with its totals and warning.
pub fn render_plan(result: &AllocationResult, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&style_text("Monthly goal allocation", StyleType::Title));
    out.push('\n');

    if result.allocations.is_empty() {
        out.push_str(&style_text("No active goals.", StyleType::Subtle));
        out.push('\n');
    } else {
        out.push_str(&allocation_table(result, symbol).to_string());
        out.push('\n');
    }

    out.push_str(&format!(
        "{} {}\n",
        style_text("Extra pool:", StyleType::TotalLabel),
        style_text(&format_currency(result.extra_pool, symbol), StyleType::TotalValue)
    ));
    out.push_str(&format!(
        "{} {}\n",
        style_text("Allocated:", StyleType::TotalLabel),
        format_currency(result.total_monthly(), symbol)
    ));
    out.push_str(&format!(
        "{} {}\n",
        style_text("Unallocated:", StyleType::TotalLabel),
        format_currency(result.unallocated, symbol)
    ));

    if let Some(warning) = &result.warning {
        out.push_str(&style_text(&format!("Warning: {warning}"), StyleType::Warning));
        out.push('\n');
    }
    out
}

pub async fn run(sources: &Sources, symbol: &str) -> Result<()> {
    let inputs = load_plan_inputs(sources).await?;
    let result = inputs.engine(symbol).calculate_contributions(&inputs.goals);
    info!(
        goals = result.allocations.len(),
        unallocated = result.unallocated,
        "Calculated allocation plan"
    );
    print!("{}", render_plan(&result, symbol));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::allocation::AllocationEngine;
    use crate::core::budget::BudgetSnapshot;
    use crate::core::goal::{Goal, GoalType};

    fn engine() -> AllocationEngine {
        AllocationEngine::new(&BudgetSnapshot::new(10000.0, 15000.0))
    }

    #[test]
    fn test_render_plan_marks_unfunded_goals() {
        let goals = vec![Goal::new("Emergency Fund", GoalType::Savings, 5000.0).with_priority(1)];
        let result = engine().calculate_contributions(&goals);

        let rendered = console::strip_ansi_codes(&render_plan(&result, "₱")).to_string();
        assert!(rendered.contains("Emergency Fund"));
        assert!(rendered.contains("never"));
        assert!(rendered.contains("unfunded"));
        assert!(rendered.contains("Unallocated: ₱0.00"));
        assert!(!rendered.contains("Warning"));
    }

    #[test]
    fn test_render_plan_shows_warning() {
        let engine = AllocationEngine::new(&BudgetSnapshot::new(50000.0, 20000.0));
        let goals = vec![
            Goal::new("Motorcycle", GoalType::Payoff, 60000.0)
                .with_priority(1)
                .with_monthly_contribution(6500.0),
            Goal::new("Phone", GoalType::Purchase, 3000.0)
                .with_priority(2)
                .with_monthly_contribution(3000.0),
        ];
        let result = engine.calculate_contributions(&goals);

        let rendered = console::strip_ansi_codes(&render_plan(&result, "₱")).to_string();
        assert!(rendered.contains("Extra pool: ₱7,500.00"));
        assert!(rendered.contains("Warning: Total goal contributions (₱9,500.00)"));
    }

    #[test]
    fn test_render_empty_plan() {
        let result = engine().calculate_contributions(&[]);
        let rendered = console::strip_ansi_codes(&render_plan(&result, "$")).to_string();
        assert!(rendered.contains("No active goals."));
    }
}
