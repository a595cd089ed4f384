use super::SaleRecord;
use std::fmt;
use tracing::warn;

/// Reason a sale record was excluded from aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingStreetName,
    MissingPrice,
    BlankStreetName,
    UnparsablePrice(String),
    UnknownStreet(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingStreetName => {
                write!(f, "record is missing the required 'Street Name' field")
            }
            RejectReason::MissingPrice => {
                write!(f, "record is missing the required 'Price' field")
            }
            RejectReason::BlankStreetName => write!(f, "street name is blank"),
            RejectReason::UnparsablePrice(raw) => {
                write!(f, "price '{raw}' is not a valid decimal number")
            }
            RejectReason::UnknownStreet(street) => {
                write!(f, "street '{street}' not found in street tree data")
            }
        }
    }
}

/// Sink for per-record rejection diagnostics.
///
/// Injected at construction so aggregation stays testable without capturing
/// log output; the default routes through `tracing`.
pub trait DiagnosticSink: Send + Sync {
    fn record_rejected(&self, record: &SaleRecord, reason: &RejectReason);
}

/// Default sink emitting rejection diagnostics as `tracing` warnings.
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn record_rejected(&self, record: &SaleRecord, reason: &RejectReason) {
        warn!(
            street_name = record.street_name.as_deref().unwrap_or("<missing>"),
            price = record.price.as_deref().unwrap_or("<missing>"),
            %reason,
            "skipping invalid sale record"
        );
    }
}
