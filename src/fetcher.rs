// src/fetcher.rs

use log::debug;
use std::slice::Chunks;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client_ops::{uid_set, IMAPClientOps};
use crate::connection::MailboxConnection;
use crate::error::{Result, TriageError};
use crate::message::RawMessage;

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Raised by the caller to stop a scan before the next batch is fetched.
pub type CancelFlag = Arc<AtomicBool>;

/// Select `mailbox` and return every UID in it, ascending.
pub fn list_all_message_ids<C>(conn: &mut MailboxConnection<C>, mailbox: &str) -> Result<Vec<u32>>
where
    C: IMAPClientOps,
{
    let client = conn.client_mut();
    client.select(mailbox).map_err(TriageError::imap)?;
    let uids = client.uid_search("ALL").map_err(TriageError::imap)?;
    debug!("UID SEARCH ALL returned {} messages in {}", uids.len(), mailbox);
    Ok(uids)
}

/// Lazily fetch `refs` in chunks of at most `batch_size`, one `UID FETCH`
/// per chunk. `on_progress(processed, total)` is called before each fetch,
/// with `processed` already including that chunk.
pub fn fetch_batches<'a, C, F>(
    conn: &'a mut MailboxConnection<C>,
    refs: &'a [u32],
    batch_size: usize,
    on_progress: F,
) -> Batches<'a, C, F>
where
    C: IMAPClientOps,
    F: FnMut(usize, usize),
{
    Batches {
        conn,
        chunks: refs.chunks(batch_size.max(1)),
        processed: 0,
        total: refs.len(),
        on_progress,
        cancel: None,
        done: false,
    }
}

/// Iterator over fetched batches. Stops after the first error.
pub struct Batches<'a, C: IMAPClientOps, F> {
    conn: &'a mut MailboxConnection<C>,
    chunks: Chunks<'a, u32>,
    processed: usize,
    total: usize,
    on_progress: F,
    cancel: Option<CancelFlag>,
    done: bool,
}

impl<'a, C: IMAPClientOps, F> Batches<'a, C, F> {
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl<'a, C, F> Iterator for Batches<'a, C, F>
where
    C: IMAPClientOps,
    F: FnMut(usize, usize),
{
    type Item = Result<Vec<RawMessage>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let chunk = self.chunks.next()?;

        if self.cancelled() {
            debug!("Scan cancelled after {}/{} messages", self.processed, self.total);
            self.done = true;
            return Some(Err(TriageError::Cancelled));
        }

        self.processed += chunk.len();
        (self.on_progress)(self.processed, self.total);

        debug!("Fetching batch of {} ({}/{})", chunk.len(), self.processed, self.total);
        match self.conn.client_mut().uid_fetch_rfc822(&uid_set(chunk)) {
            Ok(messages) => Some(Ok(messages)),
            Err(e) => {
                self.done = true;
                Some(Err(TriageError::imap(e)))
            }
        }
    }
}
