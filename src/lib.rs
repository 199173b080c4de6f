// src/lib.rs
//
// Library entry point for inbox-triage.
// Re-exports the triage engine for the CLI and integration tests.

pub mod aggregator;
pub mod cfg;
pub mod client_ops;
pub mod connection;
pub mod error;
pub mod fetcher;
pub mod folder;
pub mod message;
pub mod provider;
pub mod remediator;
pub mod triage;
pub mod unsubscribe;

pub use aggregator::{AnalysisResult, SenderAggregator, SenderSummary};
pub use client_ops::IMAPClientOps;
pub use connection::{Credentials, MailboxConnection};
pub use error::TriageError;
pub use provider::{Provider, ProviderTable};
pub use triage::ScanOptions;
