//! Per-field encoding policy.
//!
//! Every optional field of every monitor schema is listed here with its kind
//! and what happens to it on output while it holds no value. Decoding uses the
//! table to reject non-numeric values in numeric fields, and encoding uses it
//! to shape documents for [`EncodeMode::Create`].

use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::codec::EncodeMode;
use crate::error::DecodeError;
use crate::monitor::MonitorKind;

/// What an optional field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// [`crate::OptionalValue<f64>`].
    Float,
    /// [`crate::OptionalValue<u64>`].
    Unsigned,
    /// `Option<Vec<_>>`.
    List,
}

impl FieldKind {
    /// Returns true for the two numeric kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Unsigned)
    }
}

/// Output of a field that holds no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsetPolicy {
    /// Leave the key out.
    Omit,
    /// Write the key with `null`.
    Null,
}

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    /// JSON key.
    pub key: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// Output while unset, in [`EncodeMode::Update`].
    pub unset: UnsetPolicy,
}

impl FieldPolicy {
    const fn new(key: &'static str, kind: FieldKind, unset: UnsetPolicy) -> Self {
        Self { key, kind, unset }
    }

    /// Output while unset under the given mode.
    ///
    /// Create requests have nothing to clear, so unset numbers are left out.
    /// Lists keep their policy in both modes.
    #[must_use]
    pub const fn unset_policy(&self, mode: EncodeMode) -> UnsetPolicy {
        match (mode, self.kind) {
            (EncodeMode::Create, FieldKind::Float | FieldKind::Unsigned) => UnsetPolicy::Omit,
            _ => self.unset,
        }
    }

    /// Check that a raw value can fill this field.
    ///
    /// Only numeric fields are checked here; everything else is left to the
    /// schema decode.
    pub fn check(&self, raw: &RawValue) -> Result<(), DecodeError> {
        if !self.kind.is_numeric() {
            return Ok(());
        }
        let text = raw.get().trim_start();
        match text.as_bytes().first() {
            Some(b'n' | b'-' | b'0'..=b'9') => Ok(()),
            _ => Err(DecodeError::TypeMismatch {
                field: self.key.to_string(),
                raw: text.to_string(),
            }),
        }
    }
}

use FieldKind::{Float, List, Unsigned};
use UnsetPolicy::{Null, Omit};

const SCOPE_FIELDS: [FieldPolicy; 2] = [
    FieldPolicy::new("scopes", List, Omit),
    FieldPolicy::new("excludeScopes", List, Omit),
];

/// `connectivity` optional fields.
pub const CONNECTIVITY: &[FieldPolicy] = &SCOPE_FIELDS;

/// `host` optional fields.
pub const HOST: &[FieldPolicy] = &[
    FieldPolicy::new("warning", Float, Null),
    FieldPolicy::new("critical", Float, Null),
    SCOPE_FIELDS[0],
    SCOPE_FIELDS[1],
];

/// `service` optional fields.
pub const SERVICE: &[FieldPolicy] = &[
    FieldPolicy::new("warning", Float, Null),
    FieldPolicy::new("critical", Float, Null),
];

/// `external` optional fields.
pub const EXTERNAL: &[FieldPolicy] = &[
    FieldPolicy::new("responseTimeCritical", Float, Omit),
    FieldPolicy::new("responseTimeWarning", Float, Omit),
    FieldPolicy::new("responseTimeDuration", Unsigned, Omit),
    FieldPolicy::new("certificationExpirationCritical", Unsigned, Omit),
    FieldPolicy::new("certificationExpirationWarning", Unsigned, Omit),
    FieldPolicy::new("headers", List, Null),
];

/// `expression` optional fields.
pub const EXPRESSION: &[FieldPolicy] = &[
    FieldPolicy::new("warning", Float, Null),
    FieldPolicy::new("critical", Float, Null),
];

/// Policy table of a monitor kind.
#[must_use]
pub const fn fields_for(kind: MonitorKind) -> &'static [FieldPolicy] {
    match kind {
        MonitorKind::Connectivity => CONNECTIVITY,
        MonitorKind::Host => HOST,
        MonitorKind::Service => SERVICE,
        MonitorKind::External => EXTERNAL,
        MonitorKind::Expression => EXPRESSION,
    }
}

/// Drop `null` keys whose policy under `mode` is to omit them.
pub(crate) fn apply(doc: &mut Map<String, Value>, fields: &[FieldPolicy], mode: EncodeMode) {
    doc.retain(|key, value| {
        let omit = fields.iter().any(|field| {
            field.key == key.as_str() && field.unset_policy(mode) == UnsetPolicy::Omit
        });
        !(omit && value.is_null())
    });
}
