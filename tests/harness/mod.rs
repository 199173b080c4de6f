// tests/harness/mod.rs
//
// Integration testing harness for inbox-triage.
// Provides an in-memory IMAP account and a recording mock client.

#![allow(dead_code)]

pub mod mock_client;

pub use fixtures::{EmailFixture, FixtureLoader};
pub use mock_client::{FailPoint, MockIMAPClient, RecordedAction};
pub use test_harness::TestHarness;
pub use virtual_mailbox::{raw_message, StoredMessage, VirtualMailbox};
