//! Reporting threshold for indel sequences.

use std::fmt;
use std::str::FromStr;

/// Sentinel accepted on the command line (any case) for "report every indel".
pub const REPORT_ALL_SENTINEL: &str = "NA";

/// Minimum rate an indel sequence must exceed to be reported.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndelCutoff {
    /// Report rates strictly greater than the threshold.
    Threshold(f64),
    /// Report every indel regardless of rate.
    ReportAll,
}

impl IndelCutoff {
    /// Whether an indel at `rate` (a percentage, or a signed delta) is reported.
    #[inline]
    pub fn passes(&self, rate: f64) -> bool {
        match self {
            IndelCutoff::Threshold(threshold) => rate > *threshold,
            IndelCutoff::ReportAll => true,
        }
    }
}

impl Default for IndelCutoff {
    fn default() -> Self {
        IndelCutoff::Threshold(1.0)
    }
}

impl FromStr for IndelCutoff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(REPORT_ALL_SENTINEL) {
            return Ok(IndelCutoff::ReportAll);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(IndelCutoff::Threshold(value)),
            _ => Err(format!(
                "Invalid indel cutoff: {}. Expected a number or '{}'",
                s, REPORT_ALL_SENTINEL
            )),
        }
    }
}

impl fmt::Display for IndelCutoff {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IndelCutoff::Threshold(value) => write!(f, "{}", value),
            IndelCutoff::ReportAll => write!(f, "{}", REPORT_ALL_SENTINEL),
        }
    }
}
