//! Mbox splitting
//!
//! An mbox is a concatenation of messages, each starting with an envelope
//! line whose first five bytes are `From `. [`MboxReader`] streams the
//! messages one at a time; the envelope line is kept with its message so
//! concatenating every [`RawMessage::as_bytes`] reproduces the input.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::core::error::MboxError;

/// Envelope marker that starts every mbox record
pub const ENVELOPE_MARKER: &[u8] = b"From ";

/// One undecoded message from an mbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    bytes: Vec<u8>,
    envelope_len: usize,
}

impl RawMessage {
    /// Build a message from its envelope line and the lines that follow it
    #[must_use]
    pub fn new(envelope: &[u8], content: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(envelope.len() + content.len());
        bytes.extend_from_slice(envelope);
        bytes.extend_from_slice(content);
        Self {
            bytes,
            envelope_len: envelope.len(),
        }
    }

    /// The full record, envelope line included
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The envelope line (`From ...`), including its line terminator
    #[must_use]
    pub fn envelope(&self) -> &[u8] {
        &self.bytes[..self.envelope_len]
    }

    /// The RFC 5322 message: everything after the envelope line
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.bytes[self.envelope_len..]
    }
}

/// Streaming mbox splitter
///
/// Construction reads and validates the first line. Iteration consumes the
/// underlying reader; the file handle is closed when the reader is dropped,
/// whether iteration finished, failed or was abandoned.
#[derive(Debug)]
pub struct MboxReader<R> {
    reader: R,
    envelope: Option<Vec<u8>>,
    failed: bool,
}

impl MboxReader<BufReader<File>> {
    /// Open an mbox file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MboxError> {
        let file = File::open(path.as_ref())?;
        debug!("Opened mbox {}", path.as_ref().display());
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> MboxReader<R> {
    /// Wrap a buffered reader positioned at the start of an mbox
    ///
    /// Fails with [`MboxError::MalformedInput`] if the first line is not an
    /// envelope line (an empty stream included).
    pub fn new(mut reader: R) -> Result<Self, MboxError> {
        let mut first = Vec::new();
        reader.read_until(b'\n', &mut first)?;
        if !first.starts_with(ENVELOPE_MARKER) {
            return Err(MboxError::MalformedInput);
        }
        Ok(Self {
            reader,
            envelope: Some(first),
            failed: false,
        })
    }

    fn next_message(&mut self) -> Result<Option<RawMessage>, MboxError> {
        let Some(envelope) = self.envelope.take() else {
            return Ok(None);
        };

        let mut content = Vec::new();
        loop {
            let mut line = Vec::new();
            let read = self.reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            if line.starts_with(ENVELOPE_MARKER) {
                self.envelope = Some(line);
                break;
            }
            content.extend_from_slice(&line);
        }

        debug!("Split mbox message ({} bytes)", envelope.len() + content.len());
        Ok(Some(RawMessage::new(&envelope, &content)))
    }
}

impl<R: BufRead> Iterator for MboxReader<R> {
    type Item = Result<RawMessage, MboxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_message() {
            Ok(message) => message.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            },
        }
    }
}

/// Split an in-memory mbox into messages
pub fn split(bytes: &[u8]) -> Result<Vec<RawMessage>, MboxError> {
    MboxReader::new(bytes)?.collect()
}
