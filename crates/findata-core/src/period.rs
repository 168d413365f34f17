//! Reporting period definitions.
//!
//! This module defines [`Period`], the reporting window requested from
//! fundamental endpoints (financial metrics and line items).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Reporting period for fundamental data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Trailing twelve months.
    #[default]
    Ttm,
    /// Annual reporting period.
    Annual,
    /// Quarterly reporting period.
    Quarterly,
}

impl Period {
    /// Returns the wire representation used in query strings and request bodies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ttm => "ttm",
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ttm" => Ok(Self::Ttm),
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(DataError::InvalidParameter(format!(
                "Unknown period: {other}. Supported: ttm, annual, quarterly"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_round_trips_through_str() {
        assert_eq!("TTM".parse::<Period>().unwrap(), Period::Ttm);
        assert_eq!(Period::Quarterly.to_string(), "quarterly");
        assert!("weekly".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_serializes_lowercase() {
        let json = serde_json::to_string(&Period::Annual).unwrap();
        assert_eq!(json, "\"annual\"");
    }
}
