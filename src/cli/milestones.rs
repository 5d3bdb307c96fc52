use super::ui::{StyleType, style_text};
use crate::core::config::AppConfig;
use crate::core::milestone::{MilestoneEvent, MilestoneTracker};
use crate::providers::Sources;
use crate::store::KeyValueStore;
use anyhow::Result;
use tracing::{debug, info};

const COLLECTION: &str = "milestones";

pub fn render_milestones(events: &[MilestoneEvent], symbol: &str) -> String {
    if events.is_empty() {
        return format!(
            "{}\n",
            style_text("No new milestones since the last check.", StyleType::Subtle)
        );
    }
    let mut out = String::new();
    for event in events {
        let style = if event.milestone >= 100 {
            StyleType::TotalValue
        } else {
            StyleType::TotalLabel
        };
        out.push_str(&style_text(&event.message(symbol), style));
        out.push('\n');
    }
    out
}

/// Opens the milestone tracker in the configured data directory.
pub fn open_tracker(config: &AppConfig, scope: &str) -> Result<MilestoneTracker> {
    let path = config.default_data_path()?.join("store");
    debug!(path = %path.display(), "Opening milestone store");
    let store = KeyValueStore::open(&path);
    Ok(MilestoneTracker::new(store.durable_or_memory(COLLECTION), scope))
}

pub async fn run(sources: &Sources, config: &AppConfig) -> Result<()> {
    let tracker = open_tracker(config, &sources.scope)?;
    let goals = sources.goals.fetch_goals(true).await?;
    let events = tracker.check(&goals).await;
    info!(events = events.len(), "Checked milestones");
    print!("{}", render_milestones(&events, &config.currency_symbol));
    Ok(())
}
