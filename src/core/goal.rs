//! Savings and payoff goals

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Priority assigned to goals that do not declare one.
pub const DEFAULT_PRIORITY: u32 = 99;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Payoff,
    #[default]
    Savings,
    Purchase,
}

impl Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GoalType::Payoff => "payoff",
                GoalType::Savings => "savings",
                GoalType::Purchase => "purchase",
            }
        )
    }
}

impl FromStr for GoalType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "payoff" | "debt" => Ok(GoalType::Payoff),
            "savings" | "saving" => Ok(GoalType::Savings),
            "purchase" => Ok(GoalType::Purchase),
            _ => Err(anyhow::anyhow!("Invalid goal type: {}", s)),
        }
    }
}

/// Deadline of a goal, resolved from its raw `target_date` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deadline {
    /// No target date was given.
    Open,
    Due(NaiveDate),
    /// A target date was given but could not be parsed.
    Invalid(String),
}

/// A named financial target tracked by the planner.
///
/// `target_date` is kept as received so that a malformed date never prevents
/// the rest of the goal from loading; use [`Goal::deadline`] to interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub goal_type: GoalType,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

fn default_active() -> bool {
    true
}

impl Goal {
    pub fn new(name: impl Into<String>, goal_type: GoalType, target_amount: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            goal_type,
            target_amount,
            current_amount: 0.0,
            monthly_contribution: 0.0,
            priority: DEFAULT_PRIORITY,
            target_date: None,
            is_active: true,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_monthly_contribution(mut self, monthly: f64) -> Self {
        self.monthly_contribution = monthly;
        self
    }

    pub fn with_current_amount(mut self, current: f64) -> Self {
        self.current_amount = current;
        self
    }

    pub fn with_target_date(mut self, date: impl Into<String>) -> Self {
        self.target_date = Some(date.into());
        self
    }

    /// Amount still needed to complete the goal, never negative.
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() <= 0.0
    }

    /// Progress towards the target in percent. Zero for goals without a
    /// positive target.
    pub fn progress_pct(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount * 100.0
    }

    pub fn deadline(&self) -> Deadline {
        match self.target_date.as_deref().map(str::trim) {
            None | Some("") => Deadline::Open,
            Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Deadline::Due(date),
                Err(e) => Deadline::Invalid(format!("'{raw}' ({e})")),
            },
        }
    }

    /// Adds a payment to the goal. Payments only ever increase progress.
    pub fn apply_payment(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            bail!("Payment amount must be a positive number, got {amount}");
        }
        self.current_amount += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_and_completion() {
        let goal = Goal::new("Laptop", GoalType::Purchase, 60000.0).with_current_amount(15000.0);
        assert_eq!(goal.remaining(), 45000.0);
        assert!(!goal.is_complete());
        assert_eq!(goal.progress_pct(), 25.0);

        let overpaid = Goal::new("Card", GoalType::Payoff, 1000.0).with_current_amount(1200.0);
        assert_eq!(overpaid.remaining(), 0.0);
        assert!(overpaid.is_complete());
    }

    #[test]
    fn test_zero_target_has_no_progress() {
        let goal = Goal::new("Empty", GoalType::Savings, 0.0);
        assert_eq!(goal.progress_pct(), 0.0);
        assert!(goal.is_complete());
    }

    #[test]
    fn test_deadline_parsing() {
        let goal = Goal::new("Trip", GoalType::Savings, 1000.0);
        assert_eq!(goal.deadline(), Deadline::Open);

        let blank = goal.clone().with_target_date("  ");
        assert_eq!(blank.deadline(), Deadline::Open);

        let dated = goal.clone().with_target_date("2027-06-01");
        assert_eq!(
            dated.deadline(),
            Deadline::Due(NaiveDate::from_ymd_opt(2027, 6, 1).unwrap())
        );

        let garbage = goal.with_target_date("next summer");
        assert!(matches!(garbage.deadline(), Deadline::Invalid(_)));
    }

    #[test]
    fn test_apply_payment_is_monotonic() {
        let mut goal = Goal::new("Motorcycle", GoalType::Payoff, 80000.0);
        goal.apply_payment(5000.0).unwrap();
        goal.apply_payment(2500.5).unwrap();
        assert_eq!(goal.current_amount, 7500.5);

        assert!(goal.apply_payment(0.0).is_err());
        assert!(goal.apply_payment(-10.0).is_err());
        assert!(goal.apply_payment(f64::NAN).is_err());
        assert_eq!(goal.current_amount, 7500.5);
    }

    #[test]
    fn test_goal_type_from_str() {
        assert_eq!("Payoff".parse::<GoalType>().unwrap(), GoalType::Payoff);
        assert_eq!("debt".parse::<GoalType>().unwrap(), GoalType::Payoff);
        assert_eq!("purchase".parse::<GoalType>().unwrap(), GoalType::Purchase);
        assert!("vacation".parse::<GoalType>().is_err());
    }

    #[test]
    fn test_goal_deserialization_defaults() {
        let yaml = r#"
name: "Emergency Fund"
target_amount: 30000
"#;
        let goal: Goal = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(goal.goal_type, GoalType::Savings);
        assert_eq!(goal.current_amount, 0.0);
        assert_eq!(goal.monthly_contribution, 0.0);
        assert_eq!(goal.priority, DEFAULT_PRIORITY);
        assert!(goal.target_date.is_none());
        assert!(goal.is_active);
        assert!(goal.id.is_none());
    }
}
