use super::util::with_retry;
use crate::core::budget::{
    BudgetProfile, BudgetSplit, DEFAULT_EXTRA_PCT, DEFAULT_NEEDS_PCT, DEFAULT_SAVINGS_PCT,
    DEFAULT_WANTS_PCT,
};
use crate::core::config::SupabaseConfig;
use crate::core::goal::{DEFAULT_PRIORITY, Goal, GoalType};
use crate::core::provider::{BudgetProvider, GoalProvider, PaymentRecorder};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument};

const RETRIES: usize = 3;
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct GoalRow {
    id: Value,
    name: String,
    goal_type: Option<String>,
    target_amount: Option<f64>,
    current_amount: Option<f64>,
    monthly_contribution: Option<f64>,
    priority: Option<u32>,
    target_date: Option<String>,
    is_active: Option<bool>,
}

impl GoalRow {
    fn into_goal(self) -> Goal {
        let goal_type = self
            .goal_type
            .as_deref()
            .and_then(|t| t.parse::<GoalType>().ok())
            .unwrap_or_default();
        let id = match self.id {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        };
        Goal {
            id,
            name: self.name,
            goal_type,
            target_amount: self.target_amount.unwrap_or_default(),
            current_amount: self.current_amount.unwrap_or_default(),
            monthly_contribution: self.monthly_contribution.unwrap_or_default(),
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            target_date: self.target_date,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserRow {
    monthly_income: Option<f64>,
    needs_pct: Option<f64>,
    wants_pct: Option<f64>,
    savings_pct: Option<f64>,
    extra_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BillRow {
    amount: Option<f64>,
}

/// Escapes LIKE wildcards so a goal name only matches itself.
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Reads goals and budgets from a Supabase (PostgREST) backend.
pub struct SupabaseProvider {
    base_url: String,
    api_key: String,
    user_id: i64,
    client: reqwest::Client,
}

impl SupabaseProvider {
    pub fn new(base_url: &str, api_key: &str, user_id: i64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("avec/1.0")
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user_id,
            client,
        })
    }

    pub fn from_config(config: &SupabaseConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.resolve_api_key()?, config.user_id)
    }

    fn table_url(&self, table: &str, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/rest/v1/{}", self.base_url, table);
        Url::parse_with_params(&base, params).with_context(|| format!("Invalid URL: {base}"))
    }

    fn owner_filter(&self) -> (&'static str, String) {
        ("telegram_id", format!("eq.{}", self.user_id))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.table_url(table, params)?;
        debug!("Requesting {}", url);

        let response = with_retry(
            || {
                self.client
                    .get(url.clone())
                    .header("apikey", &self.api_key)
                    .bearer_auth(&self.api_key)
                    .send()
            },
            RETRIES,
            RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Request to {table} failed"))?;

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, response = %text, "Failed to parse {} response", table);
            anyhow!("Failed to parse {table} response: {e}")
        })
    }

    async fn find_goal(&self, name: &str) -> Result<GoalRow> {
        let pattern = format!("ilike.{}", escape_like(name.trim()));
        let rows: Vec<GoalRow> = self
            .select("savings_goals", &[self.owner_filter(), ("name", pattern)])
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Goal not found: {}", name))
    }
}

#[async_trait]
impl GoalProvider for SupabaseProvider {
    #[instrument(name = "SupabaseGoals", skip(self))]
    async fn fetch_goals(&self, active_only: bool) -> Result<Vec<Goal>> {
        let mut params = vec![self.owner_filter()];
        if active_only {
            params.push(("is_active", "eq.true".to_string()));
        }
        params.push(("order", "priority.asc".to_string()));

        let rows: Vec<GoalRow> = self.select("savings_goals", &params).await?;
        let mut goals: Vec<Goal> = rows.into_iter().map(GoalRow::into_goal).collect();
        goals.sort_by_key(|g| g.priority);
        debug!(count = goals.len(), "Fetched goals");
        Ok(goals)
    }
}

#[async_trait]
impl BudgetProvider for SupabaseProvider {
    #[instrument(name = "SupabaseBudget", skip(self))]
    async fn fetch_budget(&self) -> Result<BudgetProfile> {
        let owner = [self.owner_filter()];
        let active_bills = [self.owner_filter(), ("is_active", "eq.true".to_string())];
        let (users, bills) = futures::try_join!(
            self.select::<UserRow>("users", &owner),
            self.select::<BillRow>("bills", &active_bills),
        )?;

        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No user found with telegram id {}", self.user_id))?;
        let total_fixed_bills = bills.iter().filter_map(|b| b.amount).sum();

        Ok(BudgetProfile {
            monthly_income: user.monthly_income.unwrap_or_default(),
            total_fixed_bills,
            split: BudgetSplit {
                needs_pct: user.needs_pct.unwrap_or(DEFAULT_NEEDS_PCT),
                wants_pct: user.wants_pct.unwrap_or(DEFAULT_WANTS_PCT),
                savings_pct: user.savings_pct.unwrap_or(DEFAULT_SAVINGS_PCT),
                extra_pct: user.extra_pct.unwrap_or(DEFAULT_EXTRA_PCT),
            },
        })
    }
}

#[async_trait]
impl PaymentRecorder for SupabaseProvider {
    async fn record_payment(&self, goal_name: &str, amount: f64) -> Result<Goal> {
        let mut goal = self.find_goal(goal_name).await?.into_goal();
        goal.apply_payment(amount)?;
        let id = goal
            .id
            .clone()
            .ok_or_else(|| anyhow!("Goal {} has no id", goal.name))?;

        let url = self.table_url("savings_goals", &[("id", format!("eq.{id}"))])?;
        let body = json!({ "current_amount": goal.current_amount });
        with_retry(
            || {
                self.client
                    .patch(url.clone())
                    .header("apikey", &self.api_key)
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
            },
            RETRIES,
            RETRY_DELAY_MS,
        )
        .await
        .with_context(|| format!("Failed to record payment for {}", goal.name))?;

        info!(goal = %goal.name, amount, "Recorded payment");
        Ok(goal)
    }
}
