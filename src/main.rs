use clap::Parser;
use env_logger::Builder;
use eyre::{eyre, Result};
use log::{debug, LevelFilter};
use std::io::Write;

use inbox_triage::cfg::config::{load_or_default, Config};
use inbox_triage::triage::{relocate_sender, sender_statistics, trash_folder};
use inbox_triage::{AnalysisResult, Credentials};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    if cli.debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.try_init().ok();

    let config = load_or_default(cli.config.as_deref())?;
    let credentials = credentials(&cli, &config)?;
    let providers = config.provider_table();
    debug!("Known providers: {:?}", providers.domains().collect::<Vec<_>>());

    match cli.command {
        Command::Analyze {
            mailbox,
            max_messages,
            batch_size,
            json,
        } => {
            let mut options = config.scan_options();
            if let Some(mailbox) = mailbox {
                options.mailbox = mailbox;
            }
            if let Some(batch_size) = batch_size {
                options.batch_size = batch_size as usize;
            }
            if max_messages.is_some() {
                options.max_messages = max_messages;
            }

            let result = sender_statistics(&credentials, &providers, &options, |processed, total| {
                eprint!("\rProcessing email {}/{}", processed, total);
                std::io::stderr().flush().ok();
            })?;
            eprintln!();

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_table(&result);
            }
        }
        Command::Remediate { sender } => {
            let count = relocate_sender(&credentials, &providers, &sender)?;
            println!("Copied {} email(s) from {} to the trash folder", count, sender);
        }
        Command::Trash => {
            println!("{}", trash_folder(&credentials, &providers)?);
        }
    }

    Ok(())
}

/// CLI flags and environment win over the config file.
fn credentials(cli: &Cli, config: &Config) -> Result<Credentials> {
    let address = cli
        .imap_username
        .clone()
        .or_else(|| config.imap_username.clone())
        .ok_or_else(|| eyre!("No account address: pass --imap-username or set imap-username in the config"))?;
    let secret = cli
        .imap_password
        .clone()
        .or_else(|| config.imap_password.clone())
        .ok_or_else(|| eyre!("No app password: pass --imap-password or set imap-password in the config"))?;
    Ok(Credentials::new(&address, secret))
}

fn print_table(result: &AnalysisResult) {
    if result.is_empty() {
        println!("No senders found.");
        return;
    }

    println!("{:>6}  {:<40}  {:<30}  UNSUBSCRIBE", "COUNT", "ADDRESS", "NAME");
    for sender in result.iter() {
        println!(
            "{:>6}  {:<40}  {:<30}  {}",
            sender.count,
            sender.address,
            sender.display_name,
            sender.unsubscribe_link.as_deref().unwrap_or("-")
        );
    }
    println!(
        "\n{} senders across {} scanned messages ({} in mailbox, {} skipped)",
        result.len(),
        result.messages_scanned,
        result.messages_in_mailbox,
        result.skipped
    );
}
