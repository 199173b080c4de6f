// src/cli.rs

use clap::{Parser, Subcommand};
use secure_string::SecureString;
use std::path::PathBuf;

/// Command-line interface options for inbox-triage.
#[derive(Parser, Debug)]
#[command(
    name = "inbox-triage",
    version = env!("GIT_DESCRIBE"),
    about = "Rank IMAP senders by volume and sweep them into the trash",
    long_about = None
)]
pub struct Cli {
    /// Path to config file (defaults to the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Account address, e.g. someone@gmail.com
    #[arg(short = 'U', long, env = "IMAP_USERNAME")]
    pub imap_username: Option<String>,

    /// App-specific password
    #[arg(short = 'P', long, env = "IMAP_PASSWORD", hide_env_values = true)]
    pub imap_password: Option<SecureString>,

    #[arg(short, long, help = "turn on debug logging")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank the senders in a mailbox by message count
    Analyze {
        /// Mailbox to scan
        #[arg(short, long)]
        mailbox: Option<String>,

        /// Only scan the N most recent messages
        #[arg(short = 'n', long)]
        max_messages: Option<usize>,

        /// Messages per FETCH round trip
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        batch_size: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy every inbox message from SENDER into the trash folder
    Remediate {
        /// Sender address, exactly as listed by `analyze`
        sender: String,
    },

    /// Show the trash folder remediation would copy into
    Trash,
}
