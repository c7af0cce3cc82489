//! List endpoint support.
//!
//! The list endpoint answers `{"monitors": [...]}`. Each element is kept as
//! an undecoded document and decoded on its own, so one bad element cannot
//! affect how its neighbours are read. Whether a failure aborts the batch is
//! up to the caller: [`MonitorList::decode_each`] reports every element,
//! [`MonitorList::decode_all`] stops at the first failure.

use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::codec::{decode_monitor, to_document, write_document, EncodeOptions};
use crate::error::{CodecError, CodecResult, DecodeError};
use crate::monitor::Monitor;

#[derive(Deserialize)]
struct Envelope {
    monitors: Option<Vec<Box<RawValue>>>,
}

/// Undecoded monitor documents in response order.
#[derive(Debug, Clone, Default)]
pub struct MonitorList {
    entries: Vec<Box<RawValue>>,
}

impl MonitorList {
    /// Read a `{"monitors": [...]}` envelope or a bare JSON array.
    pub fn from_slice(raw: &[u8]) -> CodecResult<Self> {
        let first = raw.iter().copied().find(|b| !b.is_ascii_whitespace());
        let entries = match first {
            Some(b'[') => serde_json::from_slice(raw).map_err(DecodeError::json)?,
            Some(b'{') => {
                let envelope: Envelope =
                    serde_json::from_slice(raw).map_err(DecodeError::json)?;
                envelope.monitors.ok_or_else(|| DecodeError::InvalidEnvelope {
                    reason: "missing 'monitors' list".to_string(),
                })?
            }
            _ => {
                return Err(DecodeError::InvalidEnvelope {
                    reason: "expected a JSON object or array".to_string(),
                }
                .into())
            }
        };
        tracing::debug!(count = entries.len(), "read monitor list");
        Ok(Self { entries })
    }

    /// Wrap already separated documents.
    pub fn from_entries(entries: Vec<Box<RawValue>>) -> Self {
        Self { entries }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the list holds no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw text of each document.
    pub fn raw_entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.get())
    }

    /// Decode every document, one result per element, in order.
    pub fn decode_each(&self) -> impl Iterator<Item = CodecResult<Monitor>> + '_ {
        self.raw_entries().map(|raw| decode_monitor(raw.as_bytes()))
    }

    /// Decode every document, stopping at the first failure.
    pub fn decode_all(&self) -> CodecResult<Vec<Monitor>> {
        let mut monitors = Vec::with_capacity(self.entries.len());
        for (index, result) in self.decode_each().enumerate() {
            let monitor = result.map_err(|source| {
                tracing::debug!(index, error = %source, "monitor list decode failed");
                CodecError::Batch {
                    index,
                    source: Box::new(source),
                }
            })?;
            monitors.push(monitor);
        }
        Ok(monitors)
    }
}

/// Decode a list response, stopping at the first failure.
pub fn decode_monitors(raw: &[u8]) -> CodecResult<Vec<Monitor>> {
    MonitorList::from_slice(raw)?.decode_all()
}

/// Encode monitors as a JSON array, in order.
pub fn encode_monitors(monitors: &[Monitor], options: &EncodeOptions) -> CodecResult<Vec<u8>> {
    let docs = monitors
        .iter()
        .map(|monitor| to_document(monitor, options.mode))
        .collect::<CodecResult<Vec<_>>>()?;
    write_document(&Value::Array(docs), options.pretty)
}
