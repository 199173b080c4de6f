// src/error.rs

use thiserror::Error;

/// Failures that abort a triage operation.
///
/// Messages whose `From` header cannot be parsed and messages without an
/// unsubscribe link are not errors; they are counted or reported as `None`.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Unsupported email domain: {0}")]
    UnsupportedDomain(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Could not find Bin or Trash folder")]
    NoTrashFolderFound,

    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("Relocation failed, mailbox state unverified: {0}")]
    Remediation(String),

    #[error("Scan cancelled")]
    Cancelled,
}

impl TriageError {
    pub(crate) fn imap(e: impl std::fmt::Display) -> Self {
        TriageError::Imap(e.to_string())
    }
}

pub type Result<T, E = TriageError> = std::result::Result<T, E>;
