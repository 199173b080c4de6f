// src/folder.rs
//
// Folder entries from LIST and trash/bin folder discovery.

use imap::types::{Name, NameAttribute};

/// Names accepted as the remediation destination, in no particular priority.
pub const TRASH_CANDIDATES: [&str; 5] = [
    "Trash",
    "[Gmail]/Bin",
    "[Gmail]/Trash",
    "[Yahoo]/Bin",
    "[Yahoo]/Trash",
];

/// One folder as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub attributes: Vec<String>,
    pub delimiter: Option<char>,
    pub name: String,
}

impl FolderEntry {
    pub fn new(name: &str, delimiter: Option<char>) -> Self {
        Self {
            attributes: Vec::new(),
            delimiter,
            name: name.to_string(),
        }
    }

    pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = attributes.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a.eq_ignore_ascii_case(attribute))
    }
}

impl From<&Name> for FolderEntry {
    fn from(name: &Name) -> Self {
        Self {
            attributes: name.attributes().iter().map(attribute_name).collect(),
            delimiter: name.delimiter().and_then(|d| d.chars().next()),
            name: name.name().to_string(),
        }
    }
}

fn attribute_name(attribute: &NameAttribute) -> String {
    match attribute {
        NameAttribute::NoInferiors => "\\Noinferiors".to_string(),
        NameAttribute::NoSelect => "\\Noselect".to_string(),
        NameAttribute::Marked => "\\Marked".to_string(),
        NameAttribute::Unmarked => "\\Unmarked".to_string(),
        NameAttribute::Custom(custom) => custom.to_string(),
    }
}

/// Return the first folder, in server order, whose full name is one of the
/// trash candidates.
pub fn find_trash_folder(entries: &[FolderEntry]) -> Option<&str> {
    entries
        .iter()
        .map(|entry| entry.name.as_str())
        .find(|name| TRASH_CANDIDATES.contains(name))
}
