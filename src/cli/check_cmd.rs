//! Run one watch cycle.

use crate::checker::{self, CheckOutcome};
use crate::config::{self, Config};
use crate::extract::TableRowExtractor;
use crate::fetch::HttpClient;
use crate::telegram::TelegramClient;
use anyhow::Result;

/// Load the configuration, run the cycle, and report the outcome.
pub async fn run(config_flag: Option<&str>, dry_run: bool, json: bool, quiet: bool) -> Result<()> {
    let config_path = config::resolve_config_path(config_flag);
    let mut config = Config::load(&config_path)?;

    let telegram = TelegramClient::new(&config.telegram.token);
    let http = HttpClient::new();
    let extractor = TableRowExtractor;

    let outcome = checker::run_check(
        &mut config,
        &config_path,
        &extractor,
        &telegram,
        &http,
        dry_run,
    )
    .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !quiet {
        match &outcome {
            CheckOutcome::NoDocument => println!("No document fetched; nothing to compare."),
            CheckOutcome::ExtractionFailed => {
                println!("Fetched the page but found no release record.")
            }
            CheckOutcome::NoChange => println!("No new macOS version."),
            CheckOutcome::Changed {
                version_label,
                recipients,
                delivered,
            } => {
                if dry_run {
                    println!("New version detected (dry run): {version_label}");
                } else {
                    println!(
                        "New version detected: {version_label} \
                         (notified {delivered}/{recipients} recipient(s))"
                    );
                }
            }
        }
    }

    Ok(())
}
