use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive, optionally open-ended span of calendar days.
///
/// A missing bound places no restriction on that side. A range whose `from`
/// lies after its `to` is accepted and simply matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// A range with no bounds.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses optional `YYYY-MM-DD` bounds.
    ///
    /// Blank strings count as "no bound". Anything else that fails to parse is
    /// reported as `CoreError::InvalidDate` rather than being ignored.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            from: parse_bound(from)?,
            to: parse_bound(to)?,
        })
    }
}

fn parse_bound(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CoreError::InvalidDate(s.to_string())),
    }
}
