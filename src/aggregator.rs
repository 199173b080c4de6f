// src/aggregator.rs

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::message::{parse_sender, RawMessage};
use crate::unsubscribe;

/// Per-sender aggregate. Only `count` changes after the first message from
/// the address has been seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderSummary {
    pub display_name: String,
    pub address: String,
    pub count: usize,
    pub unsubscribe_link: Option<String>,
    /// Raw bytes of the first message seen from this sender.
    #[serde(skip)]
    pub sample: Vec<u8>,
}

/// Senders ordered by message count, descending; ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub senders: Vec<SenderSummary>,
    pub messages_in_mailbox: usize,
    pub messages_scanned: usize,
    pub skipped: usize,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SenderSummary> {
        self.senders.iter()
    }

    /// Look up a sender by address, ignoring case.
    pub fn sender(&self, address: &str) -> Option<&SenderSummary> {
        self.senders.iter().find(|s| s.address.eq_ignore_ascii_case(address))
    }
}

type Extractor = fn(&[u8]) -> Option<String>;

/// Folds raw messages into sender summaries, keyed by lower-cased address.
pub struct SenderAggregator<E = Extractor> {
    senders: IndexMap<String, SenderSummary>,
    scanned: usize,
    skipped: usize,
    extract: E,
}

impl SenderAggregator {
    pub fn new() -> Self {
        SenderAggregator::with_extractor(unsubscribe::extract as Extractor)
    }
}

impl Default for SenderAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for SenderAggregator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderAggregator")
            .field("senders", &self.senders.len())
            .field("scanned", &self.scanned)
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl<E> SenderAggregator<E>
where
    E: FnMut(&[u8]) -> Option<String>,
{
    /// Use a custom unsubscribe extractor; it runs once per distinct sender.
    pub fn with_extractor(extract: E) -> Self {
        Self {
            senders: IndexMap::new(),
            scanned: 0,
            skipped: 0,
            extract,
        }
    }

    /// Fold one message in. Returns false when its `From` did not parse.
    pub fn ingest(&mut self, raw: &[u8]) -> bool {
        self.scanned += 1;

        let Some(sender) = parse_sender(raw) else {
            self.skipped += 1;
            return false;
        };

        let key = sender.email.to_lowercase();
        if let Some(summary) = self.senders.get_mut(&key) {
            summary.count += 1;
            return true;
        }

        debug!("New sender {}", sender.email);
        let unsubscribe_link = (self.extract)(raw);
        self.senders.insert(
            key,
            SenderSummary {
                display_name: sender.name,
                address: sender.email,
                count: 1,
                unsubscribe_link,
                sample: raw.to_vec(),
            },
        );
        true
    }

    pub fn ingest_batch(&mut self, batch: &[RawMessage]) {
        for msg in batch {
            if !self.ingest(&msg.bytes) {
                warn!("Skipping UID {}: no parseable From address", msg.uid);
            }
        }
    }

    /// `messages_in_mailbox` is the mailbox size before any `max_messages` cut.
    pub fn finish(self, messages_in_mailbox: usize) -> AnalysisResult {
        let mut senders: Vec<SenderSummary> = self.senders.into_values().collect();
        senders.sort_by(|a, b| b.count.cmp(&a.count));

        AnalysisResult {
            senders,
            messages_in_mailbox,
            messages_scanned: self.scanned,
            skipped: self.skipped,
        }
    }
}

/// Consume a batch stream. The first error aborts aggregation and no partial
/// result is returned.
pub fn aggregate<I>(batches: I, messages_in_mailbox: usize) -> Result<AnalysisResult>
where
    I: IntoIterator<Item = Result<Vec<RawMessage>>>,
{
    let mut aggregator = SenderAggregator::new();
    for batch in batches {
        aggregator.ingest_batch(&batch?);
    }
    Ok(aggregator.finish(messages_in_mailbox))
}
