use chrono::{NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::i18n::I18n;

/// Sort key for statements without a usable date. Equal to the largest
/// integer a JSON consumer can represent exactly, so undated statements sort
/// last in ascending order.
pub const NO_DATE_NUMBER: u64 = 9_007_199_254_740_991;

/// Text used in the sheet for statements with no known date.
pub const NO_DATE: &str = "No Date";

/// Zero-padded `DD/MM/YYYY` parts of a sheet date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateParts {
    /// Split and pad a `DD/MM/YY[YY]` date. Every part must be non-empty
    /// ASCII digits no wider than its field; values are not checked against
    /// the calendar.
    pub fn parse(date: &str) -> Result<Self> {
        let parts: Vec<&str> = date.trim().split('/').map(str::trim).collect();
        let [day, month, year] = parts.as_slice() else {
            return Err(Error::MalformedDate(date.to_string()));
        };
        if [day, month, year]
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
            || day.len() > 2
            || month.len() > 2
            || year.len() > 4
        {
            return Err(Error::MalformedDate(date.to_string()));
        }

        let year = if year.len() <= 2 {
            format!("20{year:0>2}")
        } else {
            format!("{year:0>4}")
        };

        Ok(Self {
            day: format!("{day:0>2}"),
            month: format!("{month:0>2}"),
            year,
        })
    }

    /// `YYYYMMDD` as an integer.
    pub fn number(&self) -> Result<u64> {
        format!("{}{}{}", self.year, self.month, self.day)
            .parse()
            .map_err(|_| Error::MalformedDate(format!("{}/{}/{}", self.day, self.month, self.year)))
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.year.parse().ok()?,
            self.month.parse().ok()?,
            self.day.parse().ok()?,
        )
    }
}

fn is_no_date(date: &str) -> bool {
    let trimmed = date.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_DATE)
}

/// Numeric sort key for a sheet date. Empty, "No Date" and malformed input
/// all map to [`NO_DATE_NUMBER`].
pub fn compute_date_number(date: &str) -> u64 {
    if is_no_date(date) {
        return NO_DATE_NUMBER;
    }
    DateParts::parse(date)
        .and_then(|parts| parts.number())
        .unwrap_or(NO_DATE_NUMBER)
}

/// Localized `day short-month year` rendering of a sheet date.
///
/// Empty input stays empty and "No Date" becomes the localized label. Input
/// that does not name a real calendar day is returned as-is.
pub fn compute_formatted_date(date: &str, i18n: &I18n) -> String {
    if date.trim().is_empty() {
        return String::new();
    }
    if is_no_date(date) {
        return i18n.no_date.clone();
    }

    let Some(naive) = DateParts::parse(date).ok().and_then(|p| p.to_naive()) else {
        return date.to_string();
    };
    let Some(midnight) = naive.and_hms_opt(0, 0, 0) else {
        return date.to_string();
    };
    Utc.from_utc_datetime(&midnight)
        .format_localized("%-d %b %Y", i18n.chrono_locale())
        .to_string()
}
