use crate::core::allocation::MonthsToGoal;
use crate::core::money::format_currency;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Warning => style(text).yellow().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn money_cell(amount: f64, symbol: &str) -> Cell {
    Cell::new(format_currency(amount, symbol)).set_alignment(CellAlignment::Right)
}

/// Months to goal, with the sentinel shown as "never" in red.
pub fn months_cell(months: MonthsToGoal) -> Cell {
    match months {
        MonthsToGoal::Months(m) => Cell::new(format!("{m:.1}")).set_alignment(CellAlignment::Right),
        MonthsToGoal::Never => Cell::new("never")
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right),
    }
}

/// Creates a cell for a signed change in money with color coding.
pub fn change_cell(change: f64, symbol: &str) -> Cell {
    let sign = if change > 0.0 { "+" } else { "" };
    let text = format!("{sign}{}", format_currency(change, symbol));
    let color = if change >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "-".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("-")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a spinner shown while data is fetched.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_cell_shows_never() {
        assert_eq!(months_cell(MonthsToGoal::Never).content(), "never");
        assert_eq!(months_cell(MonthsToGoal::Months(9.2307)).content(), "9.2");
    }

    #[test]
    fn test_change_cell_sign() {
        assert_eq!(change_cell(1000.0, "₱").content(), "+₱1,000.00");
        assert_eq!(change_cell(-250.0, "₱").content(), "-₱250.00");
        assert_eq!(change_cell(0.0, "₱").content(), "₱0.00");
    }

    #[test]
    fn test_optional_cell() {
        assert_eq!(format_optional_cell(None::<u32>, |v| v.to_string()).content(), "-");
        assert_eq!(format_optional_cell(Some(6), |v: u32| v.to_string()).content(), "6");
    }
}
