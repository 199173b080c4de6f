// src/client_ops.rs
//
// Trait abstraction for the IMAP commands the triage engine issues.
// Production code runs against `imap::Session`; tests run against a mock.

use eyre::{eyre, Result};
use imap::Session;
use log::{debug, warn};
use std::io::{Read, Write};

use crate::folder::FolderEntry;
use crate::message::RawMessage;

/// One sequential IMAP conversation. Implementations are driven through
/// `&mut self`, so commands on a session are never interleaved.
pub trait IMAPClientOps {
    /// `LIST "" "*"`, parsed in server order.
    fn list_folders(&mut self) -> Result<Vec<FolderEntry>>;

    /// `SELECT` a mailbox read-write.
    fn select(&mut self, mailbox: &str) -> Result<()>;

    /// `UID SEARCH <query>`, ascending.
    fn uid_search(&mut self, query: &str) -> Result<Vec<u32>>;

    /// `UID FETCH <set> RFC822`.
    fn uid_fetch_rfc822(&mut self, uid_set: &str) -> Result<Vec<RawMessage>>;

    /// `UID COPY <set> <destination>`.
    fn uid_copy(&mut self, uid_set: &str, destination: &str) -> Result<()>;

    /// `CLOSE` the selected mailbox.
    fn close(&mut self) -> Result<()>;

    /// `LOGOUT`.
    fn logout(&mut self) -> Result<()>;
}

impl<T> IMAPClientOps for Session<T>
where
    T: Read + Write,
{
    fn list_folders(&mut self) -> Result<Vec<FolderEntry>> {
        let names = Session::list(self, Some(""), Some("*")).map_err(|e| eyre!("LIST failed: {}", e))?;
        let entries: Vec<FolderEntry> = names.iter().map(FolderEntry::from).collect();
        debug!("LIST returned {} folders", entries.len());
        Ok(entries)
    }

    fn select(&mut self, mailbox: &str) -> Result<()> {
        let status = Session::select(self, mailbox).map_err(|e| eyre!("SELECT {} failed: {}", mailbox, e))?;
        debug!("Selected '{}' ({} messages)", mailbox, status.exists);
        Ok(())
    }

    fn uid_search(&mut self, query: &str) -> Result<Vec<u32>> {
        let uids = Session::uid_search(self, query).map_err(|e| eyre!("UID SEARCH {} failed: {}", query, e))?;
        let mut uids: Vec<u32> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn uid_fetch_rfc822(&mut self, uid_set: &str) -> Result<Vec<RawMessage>> {
        let fetches = Session::uid_fetch(self, uid_set, "RFC822").map_err(|e| eyre!("UID FETCH failed: {}", e))?;

        let mut out = Vec::with_capacity(fetches.len());
        for fetch in fetches.iter() {
            let uid = fetch.uid.unwrap_or(0);
            match fetch.body() {
                Some(body) => out.push(RawMessage::new(uid, body.to_vec())),
                None => warn!("FETCH record for UID {} carried no RFC822 body", uid),
            }
        }
        Ok(out)
    }

    fn uid_copy(&mut self, uid_set: &str, destination: &str) -> Result<()> {
        Session::uid_copy(self, uid_set, destination).map_err(|e| eyre!("UID COPY → `{}` failed: {}", destination, e))
    }

    fn close(&mut self) -> Result<()> {
        Session::close(self).map_err(|e| eyre!("CLOSE failed: {}", e))
    }

    fn logout(&mut self) -> Result<()> {
        Session::logout(self).map_err(|e| eyre!("LOGOUT failed: {}", e))
    }
}

/// Render UIDs as a comma-separated IMAP sequence set.
pub fn uid_set(uids: &[u32]) -> String {
    uids.iter().map(|u| u.to_string()).collect::<Vec<_>>().join(",")
}
