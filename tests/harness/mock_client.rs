// tests/harness/mock_client.rs
//
// Mock IMAP client for testing.
// Implements IMAPClientOps against a VirtualMailbox and records every command.

use eyre::{eyre, Result};
use std::sync::{Arc, RwLock};

use inbox_triage::client_ops::IMAPClientOps;
use inbox_triage::folder::FolderEntry;
use inbox_triage::message::RawMessage;

use crate::harness::virtual_mailbox::VirtualMailbox;

/// Recorded command types for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedAction {
    List,
    Select { mailbox: String },
    Search { query: String },
    Fetch { uids: Vec<u32> },
    Copy { uids: Vec<u32>, destination: String },
    Close,
    Logout,
    /// Pushed by test progress callbacks, to check ordering against fetches.
    Progress { processed: usize, total: usize },
}

/// Commands that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailPoint {
    List,
    Select,
    Search,
    /// Fail the Nth FETCH (1-based).
    Fetch(usize),
    Copy,
    Close,
    Logout,
}

/// Mock IMAP client. Clones share the mailbox and the action log, so a clone
/// kept by the test can inspect what the connection-owned client did.
#[derive(Clone)]
pub struct MockIMAPClient {
    mailbox: Arc<RwLock<VirtualMailbox>>,
    actions: Arc<RwLock<Vec<RecordedAction>>>,
    selected: Option<String>,
    fail: Option<FailPoint>,
}

impl MockIMAPClient {
    pub fn new(mailbox: Arc<RwLock<VirtualMailbox>>) -> Self {
        Self {
            mailbox,
            actions: Arc::new(RwLock::new(Vec::new())),
            selected: None,
            fail: None,
        }
    }

    pub fn failing_at(mut self, fail: FailPoint) -> Self {
        self.fail = Some(fail);
        self
    }

    // ===== Action Recording =====

    pub fn record_action(&self, action: RecordedAction) {
        self.actions.write().unwrap().push(action);
    }

    pub fn get_recorded_actions(&self) -> Vec<RecordedAction> {
        self.actions.read().unwrap().clone()
    }

    pub fn fetch_actions(&self) -> Vec<Vec<u32>> {
        self.get_recorded_actions()
            .into_iter()
            .filter_map(|a| match a {
                RecordedAction::Fetch { uids } => Some(uids),
                _ => None,
            })
            .collect()
    }

    pub fn copy_actions(&self) -> Vec<RecordedAction> {
        self.get_recorded_actions()
            .into_iter()
            .filter(|a| matches!(a, RecordedAction::Copy { .. }))
            .collect()
    }

    pub fn count(&self, action: &RecordedAction) -> usize {
        self.get_recorded_actions().iter().filter(|a| *a == action).count()
    }

    pub fn has_action(&self, action: &RecordedAction) -> bool {
        self.count(action) > 0
    }

    // ===== Helper Methods =====

    fn fails(&self, point: FailPoint) -> bool {
        self.fail == Some(point)
    }

    fn selected(&self) -> Result<String> {
        self.selected.clone().ok_or_else(|| eyre!("BAD no mailbox selected"))
    }

    fn fetch_count(&self) -> usize {
        self.fetch_actions().len()
    }
}

fn parse_uid_set(uid_set: &str) -> Result<Vec<u32>> {
    uid_set
        .split(',')
        .map(|u| u.parse::<u32>().map_err(|e| eyre!("BAD uid set '{}': {}", uid_set, e)))
        .collect()
}

impl IMAPClientOps for MockIMAPClient {
    fn list_folders(&mut self) -> Result<Vec<FolderEntry>> {
        self.record_action(RecordedAction::List);
        if self.fails(FailPoint::List) {
            return Err(eyre!("NO LIST failed"));
        }
        Ok(self.mailbox.read().unwrap().folder_entries())
    }

    fn select(&mut self, mailbox: &str) -> Result<()> {
        self.record_action(RecordedAction::Select {
            mailbox: mailbox.to_string(),
        });
        if self.fails(FailPoint::Select) || !self.mailbox.read().unwrap().folder_exists(mailbox) {
            return Err(eyre!("NO [NONEXISTENT] Unknown mailbox {}", mailbox));
        }
        self.selected = Some(mailbox.to_string());
        Ok(())
    }

    fn uid_search(&mut self, query: &str) -> Result<Vec<u32>> {
        self.record_action(RecordedAction::Search {
            query: query.to_string(),
        });
        if self.fails(FailPoint::Search) {
            return Err(eyre!("NO SEARCH failed"));
        }
        let folder = self.selected()?;
        let mailbox = self.mailbox.read().unwrap();

        if query == "ALL" {
            return Ok(mailbox.uids(&folder));
        }
        let needle = query
            .strip_prefix("FROM \"")
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| eyre!("BAD unsupported search '{}'", query))?;
        Ok(mailbox.search_from(&folder, needle))
    }

    fn uid_fetch_rfc822(&mut self, uid_set: &str) -> Result<Vec<RawMessage>> {
        let uids = parse_uid_set(uid_set)?;
        self.record_action(RecordedAction::Fetch { uids: uids.clone() });
        if self.fails(FailPoint::Fetch(self.fetch_count())) {
            return Err(eyre!("NO FETCH failed"));
        }
        let folder = self.selected()?;
        let mailbox = self.mailbox.read().unwrap();
        Ok(uids
            .iter()
            .filter_map(|uid| mailbox.get_message(&folder, *uid))
            .map(|m| RawMessage::new(m.uid, m.raw.clone()))
            .collect())
    }

    fn uid_copy(&mut self, uid_set: &str, destination: &str) -> Result<()> {
        let uids = parse_uid_set(uid_set)?;
        self.record_action(RecordedAction::Copy {
            uids: uids.clone(),
            destination: destination.to_string(),
        });
        if self.fails(FailPoint::Copy) {
            return Err(eyre!("NO COPY failed"));
        }
        let folder = self.selected()?;
        let mut mailbox = self.mailbox.write().unwrap();
        if !mailbox.folder_exists(destination) {
            return Err(eyre!("NO [TRYCREATE] {} does not exist", destination));
        }
        mailbox.copy(&folder, &uids, destination);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.record_action(RecordedAction::Close);
        if self.fails(FailPoint::Close) {
            return Err(eyre!("NO CLOSE failed"));
        }
        self.selected()?;
        self.selected = None;
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.record_action(RecordedAction::Logout);
        if self.fails(FailPoint::Logout) {
            return Err(eyre!("BYE connection dropped"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_client() -> (MockIMAPClient, Arc<RwLock<VirtualMailbox>>) {
        let mailbox = Arc::new(RwLock::new(VirtualMailbox::new()));
        let client = MockIMAPClient::new(Arc::clone(&mailbox));
        (client, mailbox)
    }

    #[test]
    fn test_select_unknown_mailbox_fails() {
        let (mut client, _) = setup_test_client();
        assert!(client.select("Nope").is_err());
        assert!(client.select("INBOX").is_ok());
        assert_eq!(client.get_recorded_actions().len(), 2);
    }

    #[test]
    fn test_search_requires_selection() {
        let (mut client, _) = setup_test_client();
        assert!(client.uid_search("ALL").is_err());
    }

    #[test]
    fn test_search_and_fetch() {
        let (mut client, mailbox) = setup_test_client();
        mailbox.write().unwrap().add_from("INBOX", "a@x.test", "one");
        mailbox.write().unwrap().add_from("INBOX", "b@x.test", "two");

        client.select("INBOX").unwrap();
        assert_eq!(client.uid_search("ALL").unwrap(), vec![1, 2]);
        assert_eq!(client.uid_search("FROM \"b@x.test\"").unwrap(), vec![2]);

        let fetched = client.uid_fetch_rfc822("1,2").unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(client.fetch_actions(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_copy_to_missing_folder_fails() {
        let (mut client, mailbox) = setup_test_client();
        mailbox.write().unwrap().add_from("INBOX", "a@x.test", "one");
        client.select("INBOX").unwrap();
        assert!(client.uid_copy("1", "Trash").is_err());
        assert!(client.uid_copy("1", "[Gmail]/Trash").is_ok());
        assert_eq!(mailbox.read().unwrap().message_count("[Gmail]/Trash"), 1);
    }

    #[test]
    fn test_clones_share_action_log() {
        let (client, _) = setup_test_client();
        let mut owned = client.clone();
        owned.logout().unwrap();
        assert!(client.has_action(&RecordedAction::Logout));
    }

    #[test]
    fn test_fail_point_fetch_is_one_based() {
        let (client, mailbox) = setup_test_client();
        mailbox.write().unwrap().add_from("INBOX", "a@x.test", "one");
        let mut client = client.failing_at(FailPoint::Fetch(2));
        client.select("INBOX").unwrap();
        assert!(client.uid_fetch_rfc822("1").is_ok());
        assert!(client.uid_fetch_rfc822("1").is_err());
    }
}
