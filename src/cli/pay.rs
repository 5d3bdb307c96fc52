use super::ui::{StyleType, style_text};
use crate::core::goal::Goal;
use crate::core::milestone::reached_milestone;
use crate::core::money::format_currency;
use crate::providers::Sources;
use anyhow::{Result, bail};
use tracing::info;

pub fn render_payment(goal: &Goal, amount: f64, symbol: &str) -> String {
    let mut out = format!(
        "Recorded {} for {}: {} of {} ({:.1}%)\n",
        style_text(&format_currency(amount, symbol), StyleType::TotalValue),
        goal.name,
        format_currency(goal.current_amount, symbol),
        format_currency(goal.target_amount, symbol),
        goal.progress_pct()
    );
    if goal.is_complete() {
        out.push_str(&style_text("Goal complete!", StyleType::TotalValue));
        out.push('\n');
    } else {
        out.push_str(&format!(
            "{} to go.\n",
            format_currency(goal.remaining(), symbol)
        ));
    }
    if let Some(milestone) = reached_milestone(goal) {
        out.push_str(&style_text(
            &format!("{milestone}% milestone reached."),
            StyleType::Subtle,
        ));
        out.push('\n');
    }
    out
}

pub async fn run(sources: &Sources, goal_name: &str, amount: f64, symbol: &str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Payment amount must be a positive number, got {amount}");
    }
    let goal = sources.payments.record_payment(goal_name, amount).await?;
    info!(goal = %goal.name, amount, "Payment recorded");
    print!("{}", render_payment(&goal, amount, symbol));
    Ok(())
}
