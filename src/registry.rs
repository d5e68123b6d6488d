//! Recipient registry — discovery and persistence of notification targets.
//!
//! Anyone who messages the bot becomes a recipient. The registry lives in
//! the configuration file as a comma-joined field; growth triggers a whole-
//! file rewrite.

use crate::config::Config;
use crate::telegram::{TelegramClient, UpdatesPayload};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// Merge sender chat ids from `payload` into `current`.
///
/// Idempotent: replaying the same payload adds nothing new. Updates without
/// a message carry no sender and are skipped.
pub fn merge_new_recipients(
    current: &BTreeSet<String>,
    payload: &UpdatesPayload,
) -> BTreeSet<String> {
    let mut merged = current.clone();
    for update in &payload.result {
        let Some(message) = &update.message else {
            continue;
        };
        let chat_id = message.chat.id.to_string();
        if merged.insert(chat_id.clone()) {
            info!("discovered new recipient chat id: {chat_id}");
        }
    }
    merged
}

/// Poll the updates feed and fold any new chat ids into the configuration.
///
/// A failed poll or an empty feed leaves everything untouched. The
/// configuration file is rewritten only when the set actually grew; a write
/// failure is logged, not propagated — the registry stays correct in memory
/// for the rest of the run.
pub async fn refresh_recipients(client: &TelegramClient, config: &mut Config, config_path: &Path) {
    let Some(payload) = client.get_updates().await else {
        return;
    };
    if payload.result.is_empty() {
        return;
    }

    let current = config.recipients();
    let merged = merge_new_recipients(&current, &payload);
    if merged.len() > current.len() {
        config.set_recipients(&merged);
        match config.save(config_path) {
            Ok(()) => info!("recipient registry grew to {} entries", merged.len()),
            Err(e) => warn!("failed to persist recipient registry: {e:#}"),
        }
    }
}
