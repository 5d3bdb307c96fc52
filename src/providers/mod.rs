pub mod config_provider;
pub mod supabase;
pub mod util;

use crate::core::config::AppConfig;
use crate::core::provider::{BudgetProvider, GoalProvider, PaymentRecorder};
use anyhow::Result;
use config_provider::ConfigProvider;
use std::path::PathBuf;
use std::sync::Arc;
use supabase::SupabaseProvider;
use tracing::debug;

/// The providers a command reads from and writes to.
#[derive(Clone)]
pub struct Sources {
    pub goals: Arc<dyn GoalProvider>,
    pub budget: Arc<dyn BudgetProvider>,
    pub payments: Arc<dyn PaymentRecorder>,
    /// Scope for per-user records such as reported milestones.
    pub scope: String,
}

impl Sources {
    /// Uses the Supabase backend when one is configured, the config file otherwise.
    pub fn from_config(config: &AppConfig, config_path: Option<PathBuf>) -> Result<Self> {
        match &config.providers.supabase {
            Some(supabase) => {
                debug!(base_url = %supabase.base_url, "Using Supabase provider");
                let provider = Arc::new(SupabaseProvider::from_config(supabase)?);
                Ok(Self {
                    goals: provider.clone(),
                    budget: provider.clone(),
                    payments: provider,
                    scope: supabase.user_id.to_string(),
                })
            }
            None => {
                debug!("Using config file provider");
                let provider = Arc::new(ConfigProvider::new(config.clone(), config_path));
                Ok(Self {
                    goals: provider.clone(),
                    budget: provider.clone(),
                    payments: provider,
                    scope: "local".to_string(),
                })
            }
        }
    }
}
