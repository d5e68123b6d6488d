//! Announcement formatting and fan-out.

use crate::telegram::TelegramClient;
use std::collections::BTreeSet;
use tracing::warn;

/// More-information link embedded in every announcement.
const INFO_URL: &str = "https://support.apple.com/en-us/HT201222";

/// Width of the divider between announcement sections.
const DIVIDER_WIDTH: usize = 56;

/// Build the announcement for a freshly detected release record.
///
/// Line 0 of the record is the version label; line 2 is the release date
/// when the record has at least three lines, otherwise "Unknown".
pub fn format_announcement(record: &str) -> String {
    let lines: Vec<&str> = record.lines().collect();
    let version = lines.first().copied().unwrap_or("");
    let date = if lines.len() > 2 { lines[2] } else { "Unknown" };
    let divider = "-".repeat(DIVIDER_WIDTH);

    format!(
        "Hi!\n\
         New macOS is available for download.\n\
         Date of release:\n\
         {date}\n\
         {divider}\n\
         Latest available version of macOS:\n\
         {version}\n\
         {divider}\n\
         More information is available on the page:\n\
         {INFO_URL}\n"
    )
}

/// Send `message` to every recipient.
///
/// Sends are independent: a failure is logged and the loop carries on to
/// the remaining recipients. Returns the number of successful deliveries.
pub async fn notify_all(
    client: &TelegramClient,
    recipients: &BTreeSet<String>,
    message: &str,
) -> usize {
    let mut delivered = 0;
    for chat_id in recipients {
        match client.send_message(chat_id, message).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("delivery to chat {chat_id} failed: {e}"),
        }
    }
    delivered
}
