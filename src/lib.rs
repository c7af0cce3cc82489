//! # monitor-codec - typed decoding of monitoring service monitors
//!
//! The monitors endpoint returns a heterogeneous list of JSON objects whose
//! `type` key selects the schema of every other key. This crate maps that
//! tagged union onto a closed Rust enum and back without losing the
//! difference between a missing threshold and a zero threshold, or between a
//! missing list and an empty one.
//!
//! ## Core Concepts
//!
//! - **Monitor**: one of five schemas (`connectivity`, `host`, `service`,
//!   `external`, `expression`), selected by `type`
//! - **OptionalValue**: a numeric field that is either unset or holds a number
//! - **Field policy**: per-field rule for writing unset values (`null` or omitted)
//! - **MonitorList**: the `{"monitors": [...]}` envelope, decoded element by element
//!
//! ## Usage
//!
//! ```rust
//! use monitor_codec::{decode_monitor, encode_monitor, EncodeOptions, Monitor};
//!
//! let raw = br#"{"id":"2cSZzK3XfmF","type":"host","metric":"custom.foo.bar",
//!                "operator":">","warning":200.0,"duration":3,"maxCheckAttempts":5}"#;
//! let monitor = decode_monitor(raw)?;
//!
//! let Monitor::HostMetric(host) = &monitor else { unreachable!() };
//! assert_eq!(host.warning.get(), Some(200.0));
//! assert!(host.critical.is_unset());
//!
//! let body = encode_monitor(&monitor, &EncodeOptions::default())?;
//! assert!(String::from_utf8(body).unwrap().contains(r#""critical":null"#));
//! # Ok::<(), monitor_codec::CodecError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod codec;
pub mod error;
pub mod monitor;
pub mod optional;
pub mod policy;

// Re-export primary types at crate root for convenience
pub use batch::{decode_monitors, encode_monitors, MonitorList};
pub use codec::{decode_as, decode_monitor, encode_monitor, to_document, EncodeMode, EncodeOptions};
pub use error::{CodecError, CodecResult, DecodeError};
pub use monitor::{
    ConnectivityMonitor, ExpressionMonitor, ExternalHttpMonitor, HeaderField, HostMetricMonitor,
    Monitor, MonitorKind, MonitorVariant, Operator, ServiceMetricMonitor,
};
pub use optional::{Numeric, OptionalValue};
pub use policy::{FieldKind, FieldPolicy, UnsetPolicy};
