//! Core business logic: the goal model, budgets and the allocation engine

pub mod allocation;
pub mod budget;
pub mod cache;
pub mod config;
pub mod goal;
pub mod log;
pub mod milestone;
pub mod money;
pub mod provider;

// Re-export main types for cleaner imports
pub use allocation::{AllocationEngine, AllocationResult, MonthsToGoal, Suggestion};
pub use budget::{BudgetProfile, BudgetSnapshot, BudgetSplit};
pub use goal::{Goal, GoalType};
pub use provider::{BudgetProvider, GoalProvider, PaymentRecorder};
