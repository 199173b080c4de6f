// src/cfg/config.rs

use eyre::{eyre, Result};
use log::{debug, error};
use secure_string::SecureString;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::{Provider, ProviderTable, DEFAULT_IMAP_PORT};
use crate::triage::ScanOptions;

pub const CONFIG_FILE_NAME: &str = "inbox-triage.yml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "imap-username")]
    pub imap_username: Option<String>,

    #[serde(alias = "imap-password", deserialize_with = "deserialize_secret")]
    pub imap_password: Option<SecureString>,

    pub mailbox: Option<String>,

    #[serde(alias = "max-messages")]
    pub max_messages: Option<usize>,

    #[serde(alias = "batch-size")]
    pub batch_size: Option<usize>,

    /// Extra domain → IMAP endpoint entries, on top of the built-in ones.
    pub providers: BTreeMap<String, ProviderEntry>,
}

/// Either `domain: host` or `domain: { host, port }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderEntry {
    Host(String),
    Endpoint {
        host: String,
        #[serde(default = "default_port")]
        port: u16,
    },
}

fn default_port() -> u16 {
    DEFAULT_IMAP_PORT
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecureString>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(SecureString::from))
}

impl Config {
    /// Built-in providers extended (and possibly overridden) by `providers`.
    pub fn provider_table(&self) -> ProviderTable {
        let mut table = ProviderTable::default();
        for (domain, entry) in &self.providers {
            let provider = match entry {
                ProviderEntry::Host(host) => Provider::new(host),
                ProviderEntry::Endpoint { host, port } => Provider::new(host).with_port(*port),
            };
            table.insert(domain, provider);
        }
        table
    }

    pub fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions::default();
        if let Some(mailbox) = &self.mailbox {
            options.mailbox = mailbox.clone();
        }
        if let Some(batch_size) = self.batch_size {
            options.batch_size = batch_size;
        }
        options.max_messages = self.max_messages;
        options
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == Some(0) {
            return Err(eyre!("batch-size must be at least 1"));
        }
        if let Some(mailbox) = &self.mailbox {
            if mailbox.trim().is_empty() {
                return Err(eyre!("mailbox must not be empty"));
            }
        }
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/inbox-triage/inbox-triage.yml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inbox-triage").join(CONFIG_FILE_NAME))
}

pub fn load_config(config_path: &Path) -> Result<Config> {
    debug!("Loading configuration from {:?}", config_path);

    let content = fs::read_to_string(config_path).map_err(|e| {
        error!("Failed to read config file {}: {}", config_path.display(), e);
        eyre!("Failed to read config file {}: {}", config_path.display(), e)
    })?;

    let cfg = parse_config(&content)?;
    debug!("Successfully loaded configuration");
    Ok(cfg)
}

pub fn parse_config(content: &str) -> Result<Config> {
    // an empty document deserializes as null
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let cfg: Config = serde_yaml::from_str(content).map_err(|e| {
        error!("Failed to parse YAML: {}", e);
        eyre!("Failed to parse YAML: {}", e)
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `explicit` if given (it must exist), else the default path if it
/// exists, else defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => {
            debug!("No configuration file found; using defaults");
            Ok(Config::default())
        }
    }
}
