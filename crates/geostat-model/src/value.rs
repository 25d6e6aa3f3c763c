use serde::{Deserialize, Serialize};
use std::fmt;

/// A field value exactly as the retrieval collaborator delivered it.
///
/// Census tables encode everything as strings, but hand-written fixtures and
/// CSV exports frequently carry bare numbers, so both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Number(f64),
    Text(String),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

/// Reserved annotation codes published with American Community Survey tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sentinel {
    /// `-666666666` / `-`: too few sample observations to compute an estimate.
    InsufficientSample,
    /// `-888888888` / `(X)`: the estimate is not applicable.
    NotApplicable,
    /// `-999999999` / `N`: the estimate is not available for this geography.
    NotAvailable,
    /// `-222222222` / `**`: the margin of error could not be computed.
    MarginNotComputed,
    /// `-333333333` / `***`: the median falls in the upper open-ended interval.
    MedianUpperInterval,
    /// `-555555555` / `*****`: the margin of error is controlled.
    MarginControlled,
}

impl Sentinel {
    pub const ALL: [Sentinel; 6] = [
        Sentinel::InsufficientSample,
        Sentinel::NotApplicable,
        Sentinel::NotAvailable,
        Sentinel::MarginNotComputed,
        Sentinel::MedianUpperInterval,
        Sentinel::MarginControlled,
    ];

    pub fn code(self) -> i64 {
        match self {
            Sentinel::InsufficientSample => -666_666_666,
            Sentinel::NotApplicable => -888_888_888,
            Sentinel::NotAvailable => -999_999_999,
            Sentinel::MarginNotComputed => -222_222_222,
            Sentinel::MedianUpperInterval => -333_333_333,
            Sentinel::MarginControlled => -555_555_555,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Sentinel::InsufficientSample => "-",
            Sentinel::NotApplicable => "(X)",
            Sentinel::NotAvailable => "N",
            Sentinel::MarginNotComputed => "**",
            Sentinel::MedianUpperInterval => "***",
            Sentinel::MarginControlled => "*****",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Sentinel::InsufficientSample => "insufficient sample",
            Sentinel::NotApplicable => "not applicable",
            Sentinel::NotAvailable => "not available",
            Sentinel::MarginNotComputed => "margin of error not computed",
            Sentinel::MedianUpperInterval => "median in open-ended upper interval",
            Sentinel::MarginControlled => "margin of error controlled",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|sentinel| sentinel.code() == code)
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sentinel| sentinel.symbol() == symbol)
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// Why a value or derived metric has no number attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "camelCase")]
pub enum MissingReason {
    /// Null or empty field.
    Null,
    /// A documented survey annotation code.
    Sentinel(Sentinel),
    /// Text that is neither a number nor a known annotation; kept for diagnostics.
    Unparseable(String),
    /// NaN or an infinity reached the parser.
    NonFinite,
    /// The row carried no field for this code.
    Absent(String),
    /// The denominator summed to zero or less.
    ZeroDenominator,
    /// The variable names no codes for a required operand.
    NoCodes,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::Null => write!(f, "no value"),
            MissingReason::Sentinel(sentinel) => write!(f, "{sentinel}"),
            MissingReason::Unparseable(raw) => write!(f, "unparseable value {raw:?}"),
            MissingReason::NonFinite => write!(f, "non-finite value"),
            MissingReason::Absent(code) => write!(f, "{code} missing from row"),
            MissingReason::ZeroDenominator => write!(f, "denominator is zero"),
            MissingReason::NoCodes => write!(f, "no codes configured"),
        }
    }
}

/// A normalized value: a finite number or an explicit missing marker.
///
/// `Value` never holds NaN or an infinity; build numbers through
/// [`ParsedValue::from_f64`] when the input is not known to be finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ParsedValue {
    Value(f64),
    Missing(MissingReason),
}

impl ParsedValue {
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            ParsedValue::Value(value)
        } else {
            ParsedValue::Missing(MissingReason::NonFinite)
        }
    }

    pub fn missing(reason: MissingReason) -> Self {
        ParsedValue::Missing(reason)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ParsedValue::Value(value) => Some(*value),
            ParsedValue::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ParsedValue::Missing(_))
    }

    pub fn missing_reason(&self) -> Option<&MissingReason> {
        match self {
            ParsedValue::Value(_) => None,
            ParsedValue::Missing(reason) => Some(reason),
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Value(value) => write!(f, "{value}"),
            ParsedValue::Missing(reason) => write!(f, "missing: {reason}"),
        }
    }
}
