// src/connection.rs

use imap::Session;
use log::{debug, info, warn};
use native_tls::{TlsConnector, TlsStream};
use secure_string::SecureString;
use std::net::TcpStream;

use crate::client_ops::IMAPClientOps;
use crate::error::{Result, TriageError};
use crate::folder::find_trash_folder;
use crate::provider::ProviderTable;

/// The session type produced by [`MailboxConnection::open`].
pub type TlsSession = Session<TlsStream<TcpStream>>;

/// Account address plus app-specific secret.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub address: String,
    pub secret: SecureString,
}

impl Credentials {
    pub fn new(address: &str, secret: SecureString) -> Self {
        Self {
            address: address.to_string(),
            secret,
        }
    }
}

/// One authenticated IMAP session, used for a single logical operation.
///
/// The session is logged out by [`close`](Self::close) or, failing that, when
/// the connection is dropped.
pub struct MailboxConnection<C: IMAPClientOps> {
    client: C,
    trash_folder: Option<String>,
    closed: bool,
}

impl MailboxConnection<TlsSession> {
    /// Connect over TLS to the provider for `credentials.address` and log in.
    /// Any transport, TLS or login failure is reported as `Auth`.
    pub fn open(credentials: &Credentials, providers: &ProviderTable) -> Result<Self> {
        let provider = providers.resolve(&credentials.address)?;
        info!("Connecting to {}:{} as {}", provider.host, provider.port, credentials.address);

        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| TriageError::Auth(format!("TLS setup failed: {}", e)))?;

        let client = imap::connect((provider.host.as_str(), provider.port), &provider.host, &tls)
            .map_err(|e| TriageError::Auth(format!("Could not reach {}: {}", provider.host, e)))?;

        let session = client
            .login(&credentials.address, credentials.secret.unsecure())
            .map_err(|(e, _)| TriageError::Auth(e.to_string()))?;

        debug!("Logged in to {}", provider.host);
        Ok(MailboxConnection::new(session))
    }
}

impl<C: IMAPClientOps> MailboxConnection<C> {
    /// Wrap an already-authenticated client.
    pub fn new(client: C) -> Self {
        Self {
            client,
            trash_folder: None,
            closed: false,
        }
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// The trash folder, if it has been resolved on this connection.
    pub fn trash_folder(&self) -> Option<&str> {
        self.trash_folder.as_deref()
    }

    /// List the server's folders and pick the first trash candidate. The
    /// answer is kept for the rest of this connection.
    pub fn resolve_trash_folder(&mut self) -> Result<String> {
        if let Some(name) = &self.trash_folder {
            return Ok(name.clone());
        }

        let folders = self.client.list_folders().map_err(TriageError::imap)?;
        for marked in folders.iter().filter(|f| f.has_attribute("\\Trash")) {
            debug!("Server marks '{}' as \\Trash", marked.name);
        }
        let name = find_trash_folder(&folders)
            .ok_or(TriageError::NoTrashFolderFound)?
            .to_string();

        info!("Using '{}' as the trash folder", name);
        self.trash_folder = Some(name.clone());
        Ok(name)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Log out. Safe to call more than once; logout failures are only logged.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self.client.logout() {
            Ok(()) => debug!("Logged out"),
            Err(e) => warn!("Failed to logout: {}", e),
        }
    }
}

impl<C: IMAPClientOps> Drop for MailboxConnection<C> {
    fn drop(&mut self) {
        self.close();
    }
}
