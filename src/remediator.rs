// src/remediator.rs

use log::{debug, info};

use crate::client_ops::{uid_set, IMAPClientOps};
use crate::connection::MailboxConnection;
use crate::error::{Result, TriageError};

pub const INBOX: &str = "INBOX";

/// `FROM "<sender>"`, with characters that would break the quoted string removed.
pub fn from_query(sender: &str) -> String {
    let sanitized = sender.replace(['"', '\\'], "");
    format!("FROM \"{}\"", sanitized.trim())
}

/// Copy every inbox message from `sender` into the trash folder, in one
/// `UID COPY`, and return how many matched.
///
/// Messages are copied, not moved: the originals stay in the inbox. If the
/// copy fails, nothing is reported as relocated and the mailbox state should
/// be treated as unknown.
pub fn relocate_sender_messages<C>(conn: &mut MailboxConnection<C>, sender: &str) -> Result<usize>
where
    C: IMAPClientOps,
{
    let trash = conn.resolve_trash_folder()?;
    let client = conn.client_mut();

    client.select(INBOX).map_err(TriageError::imap)?;
    let query = from_query(sender);
    let uids = client.uid_search(&query).map_err(TriageError::imap)?;
    if uids.is_empty() {
        info!("No messages from {} in {}", sender, INBOX);
        return Ok(0);
    }

    debug!("Copying {} messages from {} → {}", uids.len(), sender, trash);
    client
        .uid_copy(&uid_set(&uids), &trash)
        .map_err(|e| TriageError::Remediation(e.to_string()))?;
    client
        .close()
        .map_err(|e| TriageError::Remediation(e.to_string()))?;

    info!("Copied {} messages from {} into '{}'", uids.len(), sender, trash);
    Ok(uids.len())
}
