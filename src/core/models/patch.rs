//! Patch model
//!
//! A [`Patch`] is one message of an mbox decoded into the fields the rules
//! care about. It is immutable once built.

use mail_parser::{Address, MessageParser};
use serde::Serialize;

use crate::adapters::mbox::RawMessage;
use crate::core::error::PatchError;

/// Line separating the commit message from the diff
pub const DIFF_DELIMITER: &str = "---";

/// One parsed patch e-mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    /// `From` header, e.g. `Jane Doe <jane@example.com>` (may be empty)
    pub author: String,
    /// Addresses from the `To` header
    pub to: Vec<String>,
    /// Addresses from the `Cc` header
    pub cc: Vec<String>,
    /// Raw subject, bracketed tags included
    pub subject: String,
    /// Body up to the first diff delimiter line
    pub commit_message: String,
    /// Body after the first diff delimiter line (empty if there is none)
    pub diff: String,
    /// Subject without its leading tags, on one line
    pub shortlog: String,
}

impl Patch {
    /// Parse one raw mbox message
    pub fn parse(raw: &RawMessage) -> Result<Self, PatchError> {
        Self::from_rfc5322(raw.content())
    }

    /// Parse an RFC 5322 message (no mbox envelope line)
    pub fn from_rfc5322(bytes: &[u8]) -> Result<Self, PatchError> {
        let message = MessageParser::default()
            .parse(bytes)
            .ok_or_else(|| PatchError::MalformedPatch("message could not be decoded".into()))?;

        if message.headers().is_empty() {
            return Err(PatchError::MalformedPatch("message has no headers".into()));
        }

        let subject = message.subject().unwrap_or_default().to_string();
        let body = message.body_text(0).map(|b| b.into_owned()).unwrap_or_default();
        let (commit_message, diff) = split_body(&body);

        Ok(Self {
            author: format_addresses(message.from()).join(", "),
            to: format_addresses(message.to()),
            cc: format_addresses(message.cc()),
            shortlog: shortlog(&subject),
            subject,
            commit_message: commit_message.to_string(),
            diff: diff.to_string(),
        })
    }

    /// Build a patch directly from its parts, bypassing MIME decoding
    #[must_use]
    pub fn from_parts(author: &str, subject: &str, body: &str) -> Self {
        let (commit_message, diff) = split_body(body);
        Self {
            author: author.to_string(),
            to: Vec::new(),
            cc: Vec::new(),
            subject: subject.to_string(),
            commit_message: commit_message.to_string(),
            diff: diff.to_string(),
            shortlog: shortlog(subject),
        }
    }

    /// Whether the patch carries a diff at all
    #[must_use]
    pub fn has_diff(&self) -> bool {
        !self.diff.is_empty()
    }
}

/// Render every mailbox of an address header as `Name <addr>`
fn format_addresses(addr: Option<&Address<'_>>) -> Vec<String> {
    let Some(addr) = addr else {
        return Vec::new();
    };

    let format = |name: Option<&str>, address: Option<&str>| match (name, address) {
        (Some(name), Some(address)) => Some(format!("{name} <{address}>")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    };

    match addr {
        Address::List(addrs) => addrs
            .iter()
            .filter_map(|a| format(a.name.as_deref(), a.address.as_deref()))
            .collect(),
        Address::Group(groups) => groups
            .iter()
            .flat_map(|g| g.addresses.iter())
            .filter_map(|a| format(a.name.as_deref(), a.address.as_deref()))
            .collect(),
    }
}

/// Split a body at the first line consisting solely of `---`
///
/// Without such a line the whole body is the commit message and the diff is
/// empty.
#[must_use]
pub fn split_body(body: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DIFF_DELIMITER {
            return (&body[..offset], &body[offset + line.len()..]);
        }
        offset += line.len();
    }
    (body, "")
}

/// Derive the shortlog from a subject
///
/// Everything up to and including the last `]` that precedes the first
/// colon is dropped, so stacked tags like `[kirkstone][PATCH 1/2]` go
/// together. Newlines are removed and the result is trimmed. A subject
/// without a colon is searched for `]` over its whole length.
#[must_use]
pub fn shortlog(subject: &str) -> String {
    let limit = subject.find(':').unwrap_or(subject.len());
    let start = subject[..limit].rfind(']').map_or(0, |idx| idx + 1);
    subject[start..].replace(['\r', '\n'], "").trim().to_string()
}
