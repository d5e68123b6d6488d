//! Show configuration and recorded state.

use crate::config::{self, Config};
use anyhow::Result;
use std::fs;

/// Print where the watcher looks, who it notifies, and what it last saw.
pub async fn run(config_flag: Option<&str>, json: bool) -> Result<()> {
    let config_path = config::resolve_config_path(config_flag);
    let config = Config::load(&config_path)?;

    let recipients = config.recipients();
    let last_raw = fs::read_to_string(&config.state.version_file).unwrap_or_default();
    let last_label = last_raw.lines().next().unwrap_or("");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "config": config_path.display().to_string(),
                "source_url": config.source.url,
                "search_token": config.source.search_token,
                "recipients": recipients.len(),
                "last_version": last_label,
            }))?
        );
    } else {
        println!("config:        {}", config_path.display());
        println!("source url:    {}", config.source.url);
        println!("search token:  {}", config.source.search_token);
        println!("recipients:    {}", recipients.len());
        if last_label.is_empty() {
            println!("last version:  (none recorded)");
        } else {
            println!("last version:  {last_label}");
        }
    }

    Ok(())
}
