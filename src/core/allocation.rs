//! Priority-based allocation of the monthly extra pool across goals.
//!
//! The engine is a pure calculation over a [`BudgetSnapshot`] and a goal list.
//! Every call recomputes the full plan; nothing is cached between calls except
//! the extra pool derived at construction.
use crate::core::budget::BudgetSnapshot;
use crate::core::goal::{Deadline, Goal};
use crate::core::money::{DEFAULT_CURRENCY_SYMBOL, format_currency};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use tracing::{debug, warn};

/// Share of the remaining pool granted to goals with neither an explicit
/// contribution nor a deadline. A compatibility heuristic, not an optimum.
const UNDIRECTED_SHARE: f64 = 0.5;
/// Largest fraction of a goal's contribution a reallocation may take away.
const MAX_REDUCTION_SHARE: f64 = 0.3;
/// Monthly changes at or below this are noise when comparing plans.
const MONTHLY_EPSILON: f64 = 0.01;
/// Timeline changes at or below this many months are noise.
const TIMELINE_EPSILON: f64 = 0.1;
/// Half a cent; requested totals within this of the pool still fit.
const MONEY_TOLERANCE: f64 = 0.005;

/// Projected time to finish a goal at its current allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthsToGoal {
    Months(f64),
    /// The goal receives nothing while an amount remains outstanding.
    Never,
}

impl MonthsToGoal {
    fn project(remaining: f64, monthly: f64) -> Self {
        if monthly > 0.0 {
            MonthsToGoal::Months(remaining / monthly)
        } else {
            MonthsToGoal::Never
        }
    }

    pub fn months(&self) -> Option<f64> {
        match self {
            MonthsToGoal::Months(m) => Some(*m),
            MonthsToGoal::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, MonthsToGoal::Never)
    }

    fn exceeds(&self, limit: u32) -> bool {
        match self {
            MonthsToGoal::Months(m) => *m > f64::from(limit),
            MonthsToGoal::Never => true,
        }
    }
}

impl Display for MonthsToGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthsToGoal::Months(m) => write!(f, "{m:.1}"),
            MonthsToGoal::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalAllocation {
    pub name: String,
    pub priority: u32,
    pub monthly: f64,
    pub months_to_goal: MonthsToGoal,
    pub target_date: Option<String>,
    pub remaining: f64,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    MissedDeadline,
    BudgetExceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl Display for AllocationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub extra_pool: f64,
    pub allocations: Vec<GoalAllocation>,
    pub unallocated: f64,
    pub warning: Option<AllocationWarning>,
}

impl AllocationResult {
    pub fn total_monthly(&self) -> f64 {
        self.allocations.iter().map(|a| a.monthly).sum()
    }

    /// Last allocation with the given name.
    pub fn get(&self, name: &str) -> Option<&GoalAllocation> {
        self.allocations.iter().rev().find(|a| a.name == name)
    }
}

/// Change to an existing goal's allocation caused by adding a new goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalImpact {
    pub name: String,
    pub monthly_before: f64,
    pub monthly_after: f64,
    pub months_before: MonthsToGoal,
    pub months_after: MonthsToGoal,
}

impl GoalImpact {
    pub fn monthly_change(&self) -> f64 {
        self.monthly_after - self.monthly_before
    }

    /// Change in months to goal. `None` when either side is [`MonthsToGoal::Never`].
    pub fn timeline_change(&self) -> Option<f64> {
        Some(self.months_after.months()? - self.months_before.months()?)
    }

    fn is_material(&self) -> bool {
        if self.monthly_change().abs() > MONTHLY_EPSILON {
            return true;
        }
        match (self.months_before, self.months_after) {
            (MonthsToGoal::Months(before), MonthsToGoal::Months(after)) => {
                (after - before).abs() > TIMELINE_EPSILON
            }
            (MonthsToGoal::Never, MonthsToGoal::Never) => false,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub before: AllocationResult,
    pub after: AllocationResult,
    pub impact: Vec<GoalImpact>,
    pub new_goal_allocation: Option<GoalAllocation>,
}

/// Monthly amount needed to finish a goal by its deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlinePlan {
    pub required_monthly: f64,
    pub months_available: Option<u32>,
    pub is_feasible: bool,
    pub shortfall: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reduction {
    pub goal_name: String,
    pub current_monthly: f64,
    pub suggested_monthly: f64,
    pub freed: f64,
    /// Extra months the reduced goal needs to finish.
    pub delay_months: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
    Fits { message: String },
    Reduce(Reduction),
    Shortfall { remaining: f64, message: String },
}

/// Whole calendar months from `from` until `to`: the largest `n` such that
/// `from + n months` (clamped to the end of the month) is not after `to`.
/// Negative when `to` is before `from`.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    if to < from {
        return -whole_months_between(to, from);
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    while months > 0
        && from
            .checked_add_months(Months::new(months as u32))
            .is_none_or(|date| date > to)
    {
        months -= 1;
    }
    months
}

/// Allocates the extra pool across goals in priority order.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    extra_pool: f64,
    today: NaiveDate,
    currency_symbol: String,
}

impl AllocationEngine {
    pub fn new(snapshot: &BudgetSnapshot) -> Self {
        Self {
            extra_pool: snapshot.extra_pool(),
            today: Local::now().date_naive(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    /// Pins the date deadlines are measured from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn extra_pool(&self) -> f64 {
        self.extra_pool
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.currency_symbol)
    }

    fn months_until(&self, date: NaiveDate) -> u32 {
        whole_months_between(self.today, date).max(1) as u32
    }

    /// Months left before the goal's deadline, if it has a usable one.
    fn months_available(&self, goal: &Goal) -> Option<u32> {
        match goal.deadline() {
            Deadline::Due(date) => Some(self.months_until(date)),
            Deadline::Open => None,
            Deadline::Invalid(reason) => {
                debug!(goal = %goal.name, %reason, "Ignoring unparsable target date");
                None
            }
        }
    }

    fn required_monthly(&self, goal: &Goal) -> f64 {
        let remaining = goal.remaining();
        if remaining <= 0.0 {
            return 0.0;
        }
        self.months_available(goal)
            .map_or(0.0, |months| remaining / f64::from(months))
    }

    pub fn calculate_contributions(&self, goals: &[Goal]) -> AllocationResult {
        if goals.is_empty() {
            return AllocationResult {
                extra_pool: self.extra_pool,
                allocations: Vec::new(),
                unallocated: self.extra_pool,
                warning: None,
            };
        }

        let mut active: Vec<&Goal> = goals.iter().filter(|g| g.is_active).collect();
        active.sort_by_key(|g| g.priority);

        let mut allocations = Vec::with_capacity(active.len());
        let mut remaining_pool = self.extra_pool;
        let mut total_requested = 0.0;
        let mut warning = None;

        for goal in active {
            let remaining_amount = goal.remaining();
            if remaining_amount <= 0.0 {
                allocations.push(GoalAllocation {
                    name: goal.name.clone(),
                    priority: goal.priority,
                    monthly: 0.0,
                    months_to_goal: MonthsToGoal::Months(0.0),
                    target_date: goal.target_date.clone(),
                    remaining: 0.0,
                    complete: true,
                });
                continue;
            }

            let months_available = self.months_available(goal);
            let required_monthly =
                months_available.map_or(0.0, |months| remaining_amount / f64::from(months));

            let suggested = if goal.monthly_contribution > 0.0 {
                goal.monthly_contribution
            } else {
                required_monthly.max(0.0)
            };

            let allocated = if suggested > 0.0 {
                total_requested += suggested;
                suggested.min(remaining_pool)
            } else {
                let share = (remaining_pool * UNDIRECTED_SHARE).min(remaining_amount);
                total_requested += share;
                share
            };
            remaining_pool -= allocated;

            let months_to_goal = MonthsToGoal::project(remaining_amount, allocated);
            debug!(
                goal = %goal.name,
                priority = goal.priority,
                suggested,
                allocated,
                %months_to_goal,
                "Allocated goal contribution"
            );

            if warning.is_none()
                && let Some(available) = months_available
                && months_to_goal.exceeds(available)
            {
                warning = Some(AllocationWarning {
                    kind: WarningKind::MissedDeadline,
                    message: format!(
                        "{} may miss its target date. Consider reducing other goals or extending the timeline.",
                        goal.name
                    ),
                });
            }

            allocations.push(GoalAllocation {
                name: goal.name.clone(),
                priority: goal.priority,
                monthly: allocated,
                months_to_goal,
                target_date: goal.target_date.clone(),
                remaining: remaining_amount,
                complete: false,
            });
        }

        if warning.is_none() && total_requested > self.extra_pool + MONEY_TOLERANCE {
            warning = Some(AllocationWarning {
                kind: WarningKind::BudgetExceeded,
                message: format!(
                    "Total goal contributions ({}) exceed available extra budget ({})",
                    self.money(total_requested),
                    self.money(self.extra_pool)
                ),
            });
        }

        AllocationResult {
            extra_pool: self.extra_pool,
            allocations,
            unallocated: remaining_pool.max(0.0),
            warning,
        }
    }

    /// Compares the plan with and without `new_goal`.
    pub fn simulate_new_goal(&self, existing: &[Goal], new_goal: &Goal) -> SimulationResult {
        let before = self.calculate_contributions(existing);

        let mut with_new = existing.to_vec();
        with_new.push(new_goal.clone());
        let after = self.calculate_contributions(&with_new);

        let before_by_name = index_by_name(&before.allocations);
        let after_by_name = index_by_name(&after.allocations);

        let mut seen = HashSet::new();
        let impact = before
            .allocations
            .iter()
            .filter(|a| seen.insert(a.name.as_str()))
            .filter_map(|a| {
                let old = before_by_name.get(a.name.as_str())?;
                let new = after_by_name.get(a.name.as_str())?;
                Some(GoalImpact {
                    name: a.name.clone(),
                    monthly_before: old.monthly,
                    monthly_after: new.monthly,
                    months_before: old.months_to_goal,
                    months_after: new.months_to_goal,
                })
            })
            .filter(GoalImpact::is_material)
            .collect();

        let new_goal_allocation = after_by_name
            .get(new_goal.name.as_str())
            .map(|a| (*a).clone());

        SimulationResult {
            before,
            after,
            impact,
            new_goal_allocation,
        }
    }

    /// Monthly contribution needed to finish `goal` exactly by its deadline,
    /// regardless of priority.
    pub fn optimize_for_deadline(&self, goal: &Goal) -> DeadlinePlan {
        match goal.deadline() {
            Deadline::Open => DeadlinePlan {
                required_monthly: 0.0,
                months_available: None,
                is_feasible: true,
                shortfall: 0.0,
                message: "No target date set".to_string(),
            },
            Deadline::Invalid(reason) => {
                warn!(goal = %goal.name, %reason, "Cannot plan for an invalid target date");
                DeadlinePlan {
                    required_monthly: 0.0,
                    months_available: None,
                    is_feasible: false,
                    shortfall: 0.0,
                    message: format!("Invalid target date: {reason}"),
                }
            }
            Deadline::Due(date) => {
                let months = self.months_until(date);
                let required_monthly = goal.remaining() / f64::from(months);
                DeadlinePlan {
                    required_monthly,
                    months_available: Some(months),
                    is_feasible: required_monthly <= self.extra_pool,
                    shortfall: (required_monthly - self.extra_pool).max(0.0),
                    message: format!(
                        "Need {}/month for {} months",
                        self.money(required_monthly),
                        months
                    ),
                }
            }
        }
    }

    /// Suggests trimming lower-priority goals so that `new_goal` gets what it
    /// needs.
    pub fn suggest_reallocation(&self, goals: &[Goal], new_goal: &Goal) -> Vec<Suggestion> {
        let simulation = self.simulate_new_goal(goals, new_goal);
        let granted = simulation
            .new_goal_allocation
            .as_ref()
            .map_or(0.0, |a| a.monthly);
        let needed = if new_goal.monthly_contribution > 0.0 {
            new_goal.monthly_contribution
        } else {
            self.required_monthly(new_goal)
        };

        if granted >= needed {
            return vec![Suggestion::Fits {
                message: "New goal fits within current budget allocation".to_string(),
            }];
        }

        let mut shortfall = needed - granted;
        debug!(goal = %new_goal.name, needed, granted, shortfall, "New goal is short");

        let mut candidates: Vec<&Goal> = goals
            .iter()
            .filter(|g| g.is_active && g.priority > new_goal.priority)
            .filter(|g| g.monthly_contribution > 0.0)
            .collect();
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut suggestions = Vec::new();
        for goal in candidates {
            if shortfall <= 0.0 {
                break;
            }
            let current = goal.monthly_contribution;
            let freed = (current * MAX_REDUCTION_SHARE).min(shortfall);
            if freed <= 0.0 {
                continue;
            }
            suggestions.push(Suggestion::Reduce(Reduction {
                goal_name: goal.name.clone(),
                current_monthly: current,
                suggested_monthly: current - freed,
                freed,
                delay_months: timeline_delay(goal, freed),
            }));
            shortfall -= freed;
        }

        if shortfall > 0.0 {
            suggestions.push(Suggestion::Shortfall {
                remaining: shortfall,
                message: format!(
                    "Still short {}/month. Consider extending the timeline or increasing the income allocation.",
                    self.money(shortfall)
                ),
            });
        }

        suggestions
    }
}

fn index_by_name(allocations: &[GoalAllocation]) -> HashMap<&str, &GoalAllocation> {
    allocations.iter().map(|a| (a.name.as_str(), a)).collect()
}

/// Months added to a goal's timeline when its contribution drops by `reduction`.
fn timeline_delay(goal: &Goal, reduction: f64) -> f64 {
    let remaining = goal.remaining();
    let current = goal.monthly_contribution;
    if current <= 0.0 || remaining <= 0.0 {
        return 0.0;
    }
    let reduced = current - reduction;
    if reduced <= 0.0 {
        return f64::INFINITY;
    }
    remaining / reduced - remaining / current
}
