// src/triage.rs
//
// Stateless top-level operations. Each call authenticates, resolves the trash
// folder, does its work on one connection and logs out, whatever the outcome.

use log::info;

use crate::aggregator::{aggregate, AnalysisResult};
use crate::client_ops::IMAPClientOps;
use crate::connection::{Credentials, MailboxConnection};
use crate::error::Result;
use crate::fetcher::{fetch_batches, list_all_message_ids, CancelFlag, DEFAULT_BATCH_SIZE};
use crate::provider::ProviderTable;
use crate::remediator::{relocate_sender_messages, INBOX};

/// Parameters for one analysis run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub mailbox: String,
    pub batch_size: usize,
    /// Scan only the most recent N messages (highest UIDs).
    pub max_messages: Option<usize>,
    pub cancel: Option<CancelFlag>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            mailbox: INBOX.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_messages: None,
            cancel: None,
        }
    }
}

/// The tail of `uids` that a run limited to `max` messages will scan.
pub fn most_recent(uids: &[u32], max: Option<usize>) -> &[u32] {
    match max {
        Some(max) if max < uids.len() => &uids[uids.len() - max..],
        _ => uids,
    }
}

/// Scan a mailbox on an open connection and rank its senders.
pub fn analyze<C, F>(conn: &mut MailboxConnection<C>, options: &ScanOptions, on_progress: F) -> Result<AnalysisResult>
where
    C: IMAPClientOps,
    F: FnMut(usize, usize),
{
    let uids = list_all_message_ids(conn, &options.mailbox)?;
    let to_scan = most_recent(&uids, options.max_messages);
    info!(
        "Found {} messages in {}, scanning {}",
        uids.len(),
        options.mailbox,
        to_scan.len()
    );

    let mut batches = fetch_batches(conn, to_scan, options.batch_size, on_progress);
    if let Some(flag) = &options.cancel {
        batches = batches.with_cancel(flag.clone());
    }

    let result = aggregate(batches, uids.len())?;
    info!(
        "✅ Scanned {} messages from {} senders ({} without a parseable sender)",
        result.messages_scanned,
        result.len(),
        result.skipped
    );
    Ok(result)
}

/// Open a connection, verify a trash folder exists, and analyze `options.mailbox`.
pub fn sender_statistics<F>(
    credentials: &Credentials,
    providers: &ProviderTable,
    options: &ScanOptions,
    on_progress: F,
) -> Result<AnalysisResult>
where
    F: FnMut(usize, usize),
{
    let mut conn = MailboxConnection::open(credentials, providers)?;
    sender_statistics_on(&mut conn, options, on_progress)
}

/// Body of [`sender_statistics`]. The connection is closed whatever the outcome.
pub fn sender_statistics_on<C, F>(
    conn: &mut MailboxConnection<C>,
    options: &ScanOptions,
    on_progress: F,
) -> Result<AnalysisResult>
where
    C: IMAPClientOps,
    F: FnMut(usize, usize),
{
    let result = conn
        .resolve_trash_folder()
        .and_then(|_| analyze(conn, options, on_progress));
    conn.close();
    result
}

/// Open a connection and copy every inbox message from `sender` into the
/// trash folder. Returns the number of messages copied.
pub fn relocate_sender(credentials: &Credentials, providers: &ProviderTable, sender: &str) -> Result<usize> {
    let mut conn = MailboxConnection::open(credentials, providers)?;
    relocate_sender_on(&mut conn, sender)
}

pub fn relocate_sender_on<C: IMAPClientOps>(conn: &mut MailboxConnection<C>, sender: &str) -> Result<usize> {
    let result = relocate_sender_messages(conn, sender);
    conn.close();
    result
}

/// Open a connection and report which folder remediation would copy into.
pub fn trash_folder(credentials: &Credentials, providers: &ProviderTable) -> Result<String> {
    let mut conn = MailboxConnection::open(credentials, providers)?;
    trash_folder_on(&mut conn)
}

pub fn trash_folder_on<C: IMAPClientOps>(conn: &mut MailboxConnection<C>) -> Result<String> {
    let result = conn.resolve_trash_folder();
    conn.close();
    result
}
