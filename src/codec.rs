//! Decoding and encoding of single monitor documents.
//!
//! Decoding never guesses. The `type` key is read first from an undecoded
//! view of the object, the optional numeric fields of the selected schema are
//! checked, and only then is the whole document decoded into that schema.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::error::{CodecError, CodecResult, DecodeError};
use crate::monitor::{
    ConnectivityMonitor, ExpressionMonitor, ExternalHttpMonitor, HostMetricMonitor, Monitor,
    MonitorKind, MonitorVariant, ServiceMetricMonitor,
};
use crate::policy;

/// How unset optional numbers are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodeMode {
    /// Unset thresholds are written as `null` so the server clears them.
    #[default]
    Update,
    /// Unset optional numbers are left out.
    Create,
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Treatment of unset optional numbers.
    pub mode: EncodeMode,
    /// Indent the output.
    pub pretty: bool,
}

impl EncodeOptions {
    /// Options for a create request body.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: EncodeMode::Create,
            ..Self::default()
        }
    }

    /// Sets the encode mode.
    #[must_use]
    pub fn with_mode(mut self, mode: EncodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets pretty printing.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Top-level keys of a monitor object, values left undecoded.
struct Probe<'a> {
    fields: BTreeMap<String, &'a RawValue>,
}

impl<'a> Probe<'a> {
    fn parse(raw: &'a [u8]) -> Result<Self, DecodeError> {
        let fields = serde_json::from_slice(raw).map_err(DecodeError::json)?;
        Ok(Self { fields })
    }

    fn type_literal(&self) -> Result<String, DecodeError> {
        let raw = self.fields.get("type").ok_or(DecodeError::MissingType)?;
        serde_json::from_str::<String>(raw.get()).map_err(|_| DecodeError::MissingType)
    }

    fn check_fields(&self, kind: MonitorKind) -> Result<(), DecodeError> {
        for field in policy::fields_for(kind) {
            if let Some(raw) = self.fields.get(field.key) {
                field.check(raw)?;
            }
        }
        Ok(())
    }
}

/// Decode one monitor object.
///
/// ```
/// use monitor_codec::{decode_monitor, MonitorKind};
///
/// let monitor = decode_monitor(br#"{"id":"2cSZzK3XfmG","type":"connectivity"}"#)?;
/// assert_eq!(monitor.kind(), MonitorKind::Connectivity);
/// assert_eq!(monitor.id(), "2cSZzK3XfmG");
/// # Ok::<(), monitor_codec::CodecError>(())
/// ```
pub fn decode_monitor(raw: &[u8]) -> CodecResult<Monitor> {
    let probe = Probe::parse(raw)?;
    let literal = probe.type_literal()?;
    let Some(kind) = MonitorKind::from_type(&literal) else {
        tracing::debug!(kind = %literal, "rejecting monitor with unknown type");
        return Err(CodecError::UnknownMonitorType { kind: literal });
    };
    probe.check_fields(kind)?;

    let monitor: Monitor = match kind {
        MonitorKind::Connectivity => decode_variant::<ConnectivityMonitor>(raw)?.into(),
        MonitorKind::Host => decode_variant::<HostMetricMonitor>(raw)?.into(),
        MonitorKind::Service => decode_variant::<ServiceMetricMonitor>(raw)?.into(),
        MonitorKind::External => decode_variant::<ExternalHttpMonitor>(raw)?.into(),
        MonitorKind::Expression => decode_variant::<ExpressionMonitor>(raw)?.into(),
    };
    tracing::trace!(kind = %kind, id = monitor.id(), "decoded monitor");
    Ok(monitor)
}

/// Decode one monitor object that must be of schema `V`.
///
/// Fails with `UnknownMonitorType` when the document carries another type.
pub fn decode_as<V: MonitorVariant>(raw: &[u8]) -> CodecResult<V> {
    let probe = Probe::parse(raw)?;
    let literal = probe.type_literal()?;
    if literal != V::KIND.as_str() {
        return Err(CodecError::UnknownMonitorType { kind: literal });
    }
    probe.check_fields(V::KIND)?;
    Ok(decode_variant(raw)?)
}

/// Decode into one schema, recording the path of a failing field.
fn decode_variant<V: MonitorVariant>(raw: &[u8]) -> Result<V, DecodeError> {
    let mut de = serde_json::Deserializer::from_slice(raw);
    let variant = serde_path_to_error::deserialize(&mut de).map_err(DecodeError::schema)?;
    de.end().map_err(DecodeError::json)?;
    Ok(variant)
}

/// Build the JSON document for a monitor.
///
/// Key order is `type` followed by the variant's declaration order.
pub fn to_document(monitor: &Monitor, mode: EncodeMode) -> CodecResult<Value> {
    let mut doc = serde_json::to_value(monitor).map_err(CodecError::encode)?;
    if let Value::Object(map) = &mut doc {
        policy::apply(map, policy::fields_for(monitor.kind()), mode);
    }
    Ok(doc)
}

/// Encode a monitor to JSON bytes.
pub fn encode_monitor(monitor: &Monitor, options: &EncodeOptions) -> CodecResult<Vec<u8>> {
    let doc = to_document(monitor, options.mode)?;
    write_document(&doc, options.pretty)
}

pub(crate) fn write_document(doc: &Value, pretty: bool) -> CodecResult<Vec<u8>> {
    if pretty {
        serde_json::to_vec_pretty(doc).map_err(CodecError::encode)
    } else {
        serde_json::to_vec(doc).map_err(CodecError::encode)
    }
}

/// Decodes through [`decode_monitor`].
///
/// The raw object is captured first, so this only works with `serde_json`
/// deserializers reading text (`from_str`, `from_slice`, `from_reader`).
impl<'de> Deserialize<'de> for Monitor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        decode_monitor(raw.get().as_bytes()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{HeaderField, Operator};
    use crate::optional::OptionalValue;

    #[test]
    fn test_dispatch_each_kind() {
        let cases = [
            (r#"{"type":"connectivity","id":"a"}"#, MonitorKind::Connectivity),
            (r#"{"type":"host","id":"b"}"#, MonitorKind::Host),
            (r#"{"type":"service","id":"c"}"#, MonitorKind::Service),
            (r#"{"type":"external","id":"d"}"#, MonitorKind::External),
            (r#"{"type":"expression","id":"e"}"#, MonitorKind::Expression),
        ];
        for (raw, kind) in cases {
            let monitor = decode_monitor(raw.as_bytes()).unwrap();
            assert_eq!(monitor.kind(), kind);
        }
    }

    #[test]
    fn test_type_may_come_last() {
        let raw = br#"{"id":"2cSZzK3XfmE","warning":5.0,"type":"expression"}"#;
        let monitor = decode_monitor(raw).unwrap();
        assert_eq!(monitor.as_expression().unwrap().warning.get(), Some(5.0));
    }

    #[test]
    fn test_unknown_type() {
        let err = decode_monitor(br#"{"id":"x","type":"bogus"}"#).unwrap_err();
        assert!(err.is_unknown_type());
        assert_eq!(err.unknown_type(), Some("bogus"));
    }

    #[test]
    fn test_missing_or_non_string_type() {
        for raw in [r#"{"id":"x"}"#, r#"{"id":"x","type":3}"#, r#"{"type":null}"#] {
            let err = decode_monitor(raw.as_bytes()).unwrap_err();
            assert!(
                matches!(err, CodecError::Decode(DecodeError::MissingType)),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_monitor(b"{\"type\": \"host\",").unwrap_err();
        let CodecError::Decode(DecodeError::Json { line, .. }) = err else {
            panic!("expected json error, got {err}");
        };
        assert_eq!(line, 1);

        let err = decode_monitor(b"[1, 2]").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let raw = br#"{"type":"host","id":"x","critical":"lots"}"#;
        let err = decode_monitor(raw).unwrap_err();
        let CodecError::Decode(DecodeError::TypeMismatch { field, raw }) = err else {
            panic!("expected type mismatch");
        };
        assert_eq!(field, "critical");
        assert_eq!(raw, "\"lots\"");
    }

    #[test]
    fn test_wrong_scalar_type_is_decode_error() {
        let raw = br#"{"type":"host","id":"x","maxCheckAttempts":"3"}"#;
        let err = decode_monitor(raw).unwrap_err();
        let CodecError::Decode(decode) = &err else {
            panic!("expected decode error, got {err}");
        };
        assert!(matches!(decode, DecodeError::Json { .. }));
        assert_eq!(decode.field(), Some("maxCheckAttempts"));
        assert_eq!(err.to_string().matches("column").count(), 1, "{err}");
    }

    #[test]
    fn test_nested_field_path() {
        let raw = br#"{"type":"external","headers":[{"name":"Accept","value":7}]}"#;
        let err = decode_as::<ExternalHttpMonitor>(raw).unwrap_err();
        let CodecError::Decode(decode) = &err else {
            panic!("expected decode error, got {err}");
        };
        assert_eq!(decode.field(), Some("headers[0].value"));
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let raw = br#"{"type":"expression","id":"x","operator":">="}"#;
        assert!(decode_monitor(raw).unwrap_err().is_decode());
    }

    #[test]
    fn test_decode_as() {
        let raw = br#"{"type":"host","id":"x","operator":"<","warning":1}"#;
        let host = decode_as::<HostMetricMonitor>(raw).unwrap();
        assert_eq!(host.operator, Some(Operator::LessThan));
        assert_eq!(host.warning, OptionalValue::Value(1.0));

        let err = decode_as::<ServiceMetricMonitor>(raw).unwrap_err();
        assert_eq!(err.unknown_type(), Some("host"));
    }

    #[test]
    fn test_update_and_create_modes() {
        let monitor = Monitor::from(HostMetricMonitor {
            id: "2cSZzK3XfmB".to_string(),
            critical: OptionalValue::Value(500_000.0),
            ..HostMetricMonitor::default()
        });

        let update = encode_monitor(&monitor, &EncodeOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(update).unwrap(),
            r#"{"type":"host","id":"2cSZzK3XfmB","warning":null,"critical":500000}"#
        );

        let create = encode_monitor(&monitor, &EncodeOptions::create()).unwrap();
        assert_eq!(
            String::from_utf8(create).unwrap(),
            r#"{"type":"host","id":"2cSZzK3XfmB","critical":500000}"#
        );
    }

    #[test]
    fn test_create_mode_keeps_null_headers() {
        let monitor = Monitor::from(ExternalHttpMonitor::default());
        let doc = to_document(&monitor, EncodeMode::Create).unwrap();
        assert_eq!(doc, serde_json::json!({"type": "external", "headers": null}));
    }

    #[test]
    fn test_pretty_output() {
        let monitor = Monitor::from(ExternalHttpMonitor {
            headers: Some(vec![HeaderField::new("Cache-Control", "no-cache")]),
            ..ExternalHttpMonitor::default()
        });
        let options = EncodeOptions::default().with_pretty(true);
        let text = String::from_utf8(encode_monitor(&monitor, &options).unwrap()).unwrap();
        assert!(text.contains("\n  \"headers\": [\n"));
    }

    #[test]
    fn test_non_finite_threshold_fails_encode() {
        let monitor = Monitor::from(ExpressionMonitor {
            warning: OptionalValue::Value(f64::NAN),
            ..ExpressionMonitor::default()
        });
        let err = encode_monitor(&monitor, &EncodeOptions::default()).unwrap_err();
        assert!(err.is_encode());
    }

    #[test]
    fn test_serde_deserialize_for_monitor() {
        let monitors: Vec<Monitor> = serde_json::from_str(
            r#"[{"type":"connectivity","id":"a"},{"type":"expression","id":"b"}]"#,
        )
        .unwrap();
        assert_eq!(monitors.len(), 2);
        assert_eq!(monitors[1].kind(), MonitorKind::Expression);

        let err = serde_json::from_str::<Monitor>(r#"{"type":"bogus"}"#).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }
}
