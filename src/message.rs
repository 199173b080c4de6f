// src/message.rs

use mailparse::{addrparse_header, parse_headers, MailAddr, MailHeaderMap};
use regex::Regex;
use std::sync::LazyLock;

// `addr@host (Name)`: a comment trailing the first address
static COMMENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^,(<]*\(([^()]*)\)").unwrap());

/// A mailbox address with its (possibly empty) display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub name: String,
    pub email: String,
}

/// Full RFC 822 bytes of one message, as returned by `UID FETCH ... RFC822`.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub uid: u32,
    pub bytes: Vec<u8>,
}

impl RawMessage {
    pub fn new(uid: u32, bytes: Vec<u8>) -> Self {
        Self { uid, bytes }
    }

    /// The sender from the `From` header, or `None` when it cannot be parsed
    /// into a non-empty address.
    pub fn sender(&self) -> Option<EmailAddress> {
        parse_sender(&self.bytes)
    }
}

/// Parse the first address of the `From` header. Encoded words in the display
/// name are decoded; group syntax is flattened. Without a display name, a
/// comment after the address is used as the name.
pub fn parse_sender(raw: &[u8]) -> Option<EmailAddress> {
    let (headers, _) = parse_headers(raw).ok()?;
    let from = headers.get_first_header("From")?;
    let addrs = addrparse_header(from).ok()?;

    let first = addrs.iter().find_map(|addr| match addr {
        MailAddr::Single(info) => Some(info.clone()),
        MailAddr::Group(group) => group.addrs.first().cloned(),
    })?;

    let email = first.addr.trim().to_string();
    if email.is_empty() {
        return None;
    }

    let name = match first.display_name.map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => name,
        _ => comment_name(&from.get_value()).unwrap_or_default(),
    };

    Some(EmailAddress { name, email })
}

fn comment_name(value: &str) -> Option<String> {
    COMMENT_NAME_RE
        .captures(value)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}
