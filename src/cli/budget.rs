use super::ui::{StyleType, header_cell, money_cell, new_styled_table, style_text};
use crate::core::budget::BudgetProfile;
use crate::core::money::format_currency;
use crate::providers::Sources;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub fn render_budget(profile: &BudgetProfile, symbol: &str) -> String {
    let snapshot = profile.snapshot();
    let budgets = profile.category_budgets();
    let split = &profile.split;

    let mut out = String::new();
    out.push_str(&style_text("Monthly budget", StyleType::Title));
    out.push('\n');
    out.push_str(&format!(
        "Income: {}\nFixed bills: {}\nAvailable after bills: {}\n",
        format_currency(profile.monthly_income, symbol),
        format_currency(profile.total_fixed_bills, symbol),
        format_currency(snapshot.available(), symbol)
    ));

    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Share"),
        header_cell("Monthly"),
    ]);
    for (label, pct, amount) in [
        ("Needs", split.needs_pct, budgets.needs),
        ("Wants", split.wants_pct, budgets.wants),
        ("Savings", split.savings_pct, budgets.savings),
        ("Extra (goals)", split.extra_pct, budgets.extra),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(format!("{pct:.0}%")).set_alignment(CellAlignment::Right),
            money_cell(amount, symbol),
        ]);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    if let Err(e) = split.validate() {
        out.push_str(&style_text(&format!("Warning: {e}"), StyleType::Warning));
        out.push('\n');
    }
    out
}

pub async fn run(sources: &Sources, symbol: &str) -> Result<()> {
    let profile = sources.budget.fetch_budget().await?;
    print!("{}", render_budget(&profile, symbol));
    Ok(())
}
