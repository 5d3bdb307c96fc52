use crate::core::budget::{BudgetProfile, BudgetSplit};
use crate::core::goal::Goal;
use crate::core::money::DEFAULT_CURRENCY_SYMBOL;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf};
use tracing::debug;

/// Environment variable consulted when the Supabase API key is not configured.
pub const SUPABASE_KEY_ENV: &str = "SUPABASE_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Bill {
    pub name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_day: Option<u8>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BudgetConfig {
    #[serde(default)]
    pub monthly_income: f64,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub split: BudgetSplit,
}

impl BudgetConfig {
    pub fn total_fixed_bills(&self) -> f64 {
        self.bills
            .iter()
            .filter(|b| b.is_active)
            .map(|b| b.amount)
            .sum()
    }

    pub fn profile(&self) -> BudgetProfile {
        BudgetProfile {
            monthly_income: self.monthly_income,
            total_fixed_bills: self.total_fixed_bills(),
            split: self.split,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub base_url: String,
    /// Telegram id of the user whose records are read.
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SupabaseConfig {
    /// Configured API key, falling back to the `SUPABASE_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(SUPABASE_KEY_ENV).with_context(|| {
            format!("No Supabase API key configured and {SUPABASE_KEY_ENV} is not set")
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SupabaseConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            budget: BudgetConfig::default(),
            goals: Vec::new(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("ph", "avec", "avec").context("Could not determine project directories")
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .budget
            .split
            .validate()
            .with_context(|| format!("Invalid budget in {}", path.as_ref().display()))?;
        debug!(goals = config.goals.len(), "Successfully loaded config");
        Ok(config)
    }

    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let config_str = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path.as_ref(), config_str)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        debug!("Saved config to {}", path.as_ref().display());
        Ok(())
    }

    /// Case-insensitive goal lookup.
    pub fn find_goal_mut(&mut self, name: &str) -> Option<&mut Goal> {
        let wanted = name.trim().to_lowercase();
        self.goals
            .iter_mut()
            .find(|g| g.name.to_lowercase() == wanted)
    }
}
