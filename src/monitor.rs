//! Monitor resource types.
//!
//! A monitor document is one flat JSON object whose `type` key selects the
//! schema of the remaining keys. Each schema is a plain struct here, and
//! [`Monitor`] is the closed set of them.
//!
//! Scalar fields follow the service's wire convention: an empty string, `0`
//! or `false` is left out of the output and a missing key reads back as that
//! zero value. Optional numeric fields use [`OptionalValue`], and list fields
//! use `Option<Vec<_>>` so that "not given" and "given as `[]`" stay apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::optional::OptionalValue;

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(v: &bool) -> bool {
    !*v
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// Discriminator values of the `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorKind {
    /// Host liveness.
    Connectivity,
    /// Host metric threshold.
    Host,
    /// Service metric threshold.
    Service,
    /// External HTTP check.
    External,
    /// Expression over aggregated metrics.
    Expression,
}

impl MonitorKind {
    /// Every kind, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Connectivity,
        Self::Host,
        Self::Service,
        Self::External,
        Self::Expression,
    ];

    /// The literal used in the `type` key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Host => "host",
            Self::Service => "service",
            Self::External => "external",
            Self::Expression => "expression",
        }
    }

    /// Look up a kind by its `type` literal.
    #[must_use]
    pub fn from_type(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Alert when the observed value is above the threshold.
    #[serde(rename = ">")]
    GreaterThan,
    /// Alert when the observed value is below the threshold.
    #[serde(rename = "<")]
    LessThan,
}

impl Operator {
    /// The literal used in the `operator` key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request header sent by an external HTTP check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl HeaderField {
    /// Creates a header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Alerts when a host stops reporting.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectivityMonitor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memo: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_mute: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub notification_interval: u64,
    /// Alert status raised when a host disappears (`CRITICAL` or `WARNING`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alert_status_on_gone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_scopes: Option<Vec<String>>,
}

/// Threshold on a host metric.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostMetricMonitor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memo: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_mute: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub notification_interval: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub warning: OptionalValue<f64>,
    pub critical: OptionalValue<f64>,
    /// Evaluation window, in minutes of samples.
    #[serde(skip_serializing_if = "is_zero")]
    pub duration: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_check_attempts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_scopes: Option<Vec<String>>,
}

/// Threshold on a service metric.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceMetricMonitor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memo: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_mute: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub notification_interval: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub warning: OptionalValue<f64>,
    pub critical: OptionalValue<f64>,
    #[serde(skip_serializing_if = "is_zero")]
    pub duration: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_check_attempts: u64,
    /// Minutes without posted values before a warning.
    #[serde(skip_serializing_if = "is_zero")]
    pub missing_duration_warning: u64,
    /// Minutes without posted values before a critical alert.
    #[serde(skip_serializing_if = "is_zero")]
    pub missing_duration_critical: u64,
}

/// Synthetic HTTP check against an external URL.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalHttpMonitor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memo: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_mute: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub notification_interval: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_check_attempts: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    /// Milliseconds.
    #[serde(skip_serializing_if = "OptionalValue::is_unset")]
    pub response_time_critical: OptionalValue<f64>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "OptionalValue::is_unset")]
    pub response_time_warning: OptionalValue<f64>,
    /// Minutes averaged over when comparing response times.
    #[serde(skip_serializing_if = "OptionalValue::is_unset")]
    pub response_time_duration: OptionalValue<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub contains_string: String,
    /// Days before certificate expiry.
    #[serde(skip_serializing_if = "OptionalValue::is_unset")]
    pub certification_expiration_critical: OptionalValue<u64>,
    /// Days before certificate expiry.
    #[serde(skip_serializing_if = "OptionalValue::is_unset")]
    pub certification_expiration_warning: OptionalValue<u64>,
    #[serde(skip_serializing_if = "is_false")]
    pub skip_certificate_verification: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub follow_redirect: bool,
    /// Always written; `None` goes out as `null`, `Some(vec![])` as `[]`.
    pub headers: Option<Vec<HeaderField>>,
}

/// Threshold on an expression over aggregated metrics.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpressionMonitor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub memo: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_mute: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub notification_interval: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub warning: OptionalValue<f64>,
    pub critical: OptionalValue<f64>,
}

/// A concrete monitor schema.
pub trait MonitorVariant: Serialize + for<'de> Deserialize<'de> + Into<Monitor> {
    /// The `type` literal selecting this schema.
    const KIND: MonitorKind;
}

impl MonitorVariant for ConnectivityMonitor {
    const KIND: MonitorKind = MonitorKind::Connectivity;
}

impl MonitorVariant for HostMetricMonitor {
    const KIND: MonitorKind = MonitorKind::Host;
}

impl MonitorVariant for ServiceMetricMonitor {
    const KIND: MonitorKind = MonitorKind::Service;
}

impl MonitorVariant for ExternalHttpMonitor {
    const KIND: MonitorKind = MonitorKind::External;
}

impl MonitorVariant for ExpressionMonitor {
    const KIND: MonitorKind = MonitorKind::Expression;
}

/// Any monitor, tagged by its `type`.
///
/// Serializing writes `type` first, followed by the variant's own keys.
/// Decoding goes through [`crate::decode_monitor`], which checks the
/// discriminator before touching the rest of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Monitor {
    /// `type: "connectivity"`
    #[serde(rename = "connectivity")]
    Connectivity(ConnectivityMonitor),
    /// `type: "host"`
    #[serde(rename = "host")]
    HostMetric(HostMetricMonitor),
    /// `type: "service"`
    #[serde(rename = "service")]
    ServiceMetric(ServiceMetricMonitor),
    /// `type: "external"`
    #[serde(rename = "external")]
    ExternalHttp(ExternalHttpMonitor),
    /// `type: "expression"`
    #[serde(rename = "expression")]
    Expression(ExpressionMonitor),
}

// Reads a field every variant declares.
macro_rules! common {
    ($monitor:expr, $m:ident => $body:expr) => {
        match $monitor {
            Monitor::Connectivity($m) => $body,
            Monitor::HostMetric($m) => $body,
            Monitor::ServiceMetric($m) => $body,
            Monitor::ExternalHttp($m) => $body,
            Monitor::Expression($m) => $body,
        }
    };
}

impl Monitor {
    /// The discriminator of the held variant.
    #[must_use]
    pub const fn kind(&self) -> MonitorKind {
        match self {
            Self::Connectivity(_) => MonitorKind::Connectivity,
            Self::HostMetric(_) => MonitorKind::Host,
            Self::ServiceMetric(_) => MonitorKind::Service,
            Self::ExternalHttp(_) => MonitorKind::External,
            Self::Expression(_) => MonitorKind::Expression,
        }
    }

    /// The `type` literal of the held variant.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Monitor ID; empty for monitors not yet created.
    #[must_use]
    pub fn id(&self) -> &str {
        common!(self, m => m.id.as_str())
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        common!(self, m => m.name.as_str())
    }

    /// Free-form note.
    #[must_use]
    pub fn memo(&self) -> &str {
        common!(self, m => m.memo.as_str())
    }

    /// Whether notifications are muted.
    #[must_use]
    pub fn is_mute(&self) -> bool {
        common!(self, m => m.is_mute)
    }

    /// Re-notification interval in minutes; `0` means none.
    #[must_use]
    pub fn notification_interval(&self) -> u64 {
        common!(self, m => m.notification_interval)
    }

    /// The connectivity monitor, if this is one.
    #[must_use]
    pub fn as_connectivity(&self) -> Option<&ConnectivityMonitor> {
        match self {
            Self::Connectivity(m) => Some(m),
            _ => None,
        }
    }

    /// The host metric monitor, if this is one.
    #[must_use]
    pub fn as_host_metric(&self) -> Option<&HostMetricMonitor> {
        match self {
            Self::HostMetric(m) => Some(m),
            _ => None,
        }
    }

    /// The service metric monitor, if this is one.
    #[must_use]
    pub fn as_service_metric(&self) -> Option<&ServiceMetricMonitor> {
        match self {
            Self::ServiceMetric(m) => Some(m),
            _ => None,
        }
    }

    /// The external HTTP monitor, if this is one.
    #[must_use]
    pub fn as_external_http(&self) -> Option<&ExternalHttpMonitor> {
        match self {
            Self::ExternalHttp(m) => Some(m),
            _ => None,
        }
    }

    /// The expression monitor, if this is one.
    #[must_use]
    pub fn as_expression(&self) -> Option<&ExpressionMonitor> {
        match self {
            Self::Expression(m) => Some(m),
            _ => None,
        }
    }
}

impl From<ConnectivityMonitor> for Monitor {
    fn from(m: ConnectivityMonitor) -> Self {
        Self::Connectivity(m)
    }
}

impl From<HostMetricMonitor> for Monitor {
    fn from(m: HostMetricMonitor) -> Self {
        Self::HostMetric(m)
    }
}

impl From<ServiceMetricMonitor> for Monitor {
    fn from(m: ServiceMetricMonitor) -> Self {
        Self::ServiceMetric(m)
    }
}

impl From<ExternalHttpMonitor> for Monitor {
    fn from(m: ExternalHttpMonitor) -> Self {
        Self::ExternalHttp(m)
    }
}

impl From<ExpressionMonitor> for Monitor {
    fn from(m: ExpressionMonitor) -> Self {
        Self::Expression(m)
    }
}
