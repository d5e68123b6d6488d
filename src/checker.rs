//! One watch cycle — the change-detection state machine.
//!
//! refresh recipients → load last version → fetch → extract → compare →
//! notify + persist. Every failure past configuration loading degrades to a
//! logged no-op for the run; the next scheduled invocation is the only
//! retry mechanism.

use crate::config::Config;
use crate::extract::RecordExtractor;
use crate::fetch::HttpClient;
use crate::notify;
use crate::registry;
use crate::state;
use crate::telegram::TelegramClient;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

/// How a watch cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The fetch yielded no document; nothing else ran.
    NoDocument,
    /// The record differs from the stored value but came back empty.
    ExtractionFailed,
    /// The record matches the stored value; nobody was notified.
    NoChange,
    /// A new version was detected and the fan-out ran.
    Changed {
        version_label: String,
        recipients: usize,
        delivered: usize,
    },
}

/// Run one watch cycle.
///
/// With `dry_run` set, detection still runs but nothing is sent and nothing
/// is written — neither the recipient registry nor the version state.
pub async fn run_check(
    config: &mut Config,
    config_path: &Path,
    extractor: &dyn RecordExtractor,
    telegram: &TelegramClient,
    http: &HttpClient,
    dry_run: bool,
) -> CheckOutcome {
    if !dry_run {
        registry::refresh_recipients(telegram, config, config_path).await;
    }

    let last_version = state::read_last_version(&config.state.version_file);

    let document = http.fetch_document(&config.source.url).await;
    if document.is_empty() {
        info!("no document fetched; ending run");
        return CheckOutcome::NoDocument;
    }

    let record = extractor.extract(&document, &config.source.search_token);
    if state::normalize(&record) == last_version {
        info!("no change detected");
        return CheckOutcome::NoChange;
    }

    let Some(version_label) = record.lines().next().map(str::to_string) else {
        error!("no release record could be extracted from the fetched document");
        return CheckOutcome::ExtractionFailed;
    };

    info!("new version detected: {version_label}");
    let message = notify::format_announcement(&record);
    let recipients = config.recipients();

    if dry_run {
        info!(
            "dry run: would notify {} recipient(s) with:\n{message}",
            recipients.len()
        );
        return CheckOutcome::Changed {
            version_label,
            recipients: recipients.len(),
            delivered: 0,
        };
    }

    let delivered = notify::notify_all(telegram, &recipients, &message).await;

    if let Err(e) = state::write_latest_version(&config.state.version_file, &record) {
        error!("failed to persist latest version: {e:#}");
    }

    CheckOutcome::Changed {
        version_label,
        recipients: recipients.len(),
        delivered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = CheckOutcome::Changed {
            version_label: "macOS Sequoia 15.6".to_string(),
            recipients: 2,
            delivered: 2,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "changed");
        assert_eq!(json["version_label"], "macOS Sequoia 15.6");

        let json = serde_json::to_value(CheckOutcome::NoChange).unwrap();
        assert_eq!(json["outcome"], "no_change");
    }
}
