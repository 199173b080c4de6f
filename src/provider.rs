// src/provider.rs

use std::collections::BTreeMap;

use log::debug;

use crate::error::{Result, TriageError};

pub const DEFAULT_IMAP_PORT: u16 = 993;

/// IMAP endpoint for one mail domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub host: String,
    pub port: u16,
}

impl Provider {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            port: DEFAULT_IMAP_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Domain → IMAP endpoint lookup. There is no wildcard or MX fallback: a
/// domain is either in the table or unsupported.
#[derive(Debug, Clone)]
pub struct ProviderTable {
    entries: BTreeMap<String, Provider>,
}

impl Default for ProviderTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("gmail.com".to_string(), Provider::new("imap.gmail.com"));
        entries.insert("yahoo.com".to_string(), Provider::new("imap.mail.yahoo.com"));
        Self { entries }
    }
}

impl ProviderTable {
    /// Add or replace the endpoint for `domain`.
    pub fn insert(&mut self, domain: &str, provider: Provider) {
        self.entries.insert(domain.to_lowercase(), provider);
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve the endpoint for an email address.
    pub fn resolve(&self, address: &str) -> Result<&Provider> {
        let domain = domain_of(address);
        match self.entries.get(&domain) {
            Some(provider) => {
                debug!("Resolved domain '{}' to {}:{}", domain, provider.host, provider.port);
                Ok(provider)
            }
            None => Err(TriageError::UnsupportedDomain(domain)),
        }
    }
}

/// Lower-cased substring after the last `@`. An address without `@` is
/// treated as a bare domain.
fn domain_of(address: &str) -> String {
    let lower = address.to_lowercase();
    match lower.rsplit_once('@') {
        Some((_, domain)) => domain.to_string(),
        None => lower,
    }
}
