mod calendar;
mod consts;
mod convert;
mod data;
mod error;
mod format;
mod gregorian;
mod prelude;
mod table;
mod types;

pub use calendar::{MonthCell, MonthGrid, NepaliCalendar};
pub use consts::*;
pub use convert::{REF_AD, ad_to_bs, bs_to_ad, from_ordinal, to_ordinal};
pub use error::DateError;
pub use format::{Calendar, FormatOptions, Locale};
pub use gregorian::AdDate;
pub use table::{month_length, year_length};
pub use types::{Day, MonthIndex, Year};

use crate::prelude::*;
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A date on the Bikram Sambat calendar, validated against the month-length
/// table at construction and immutable afterwards.
///
/// Equality is field equality; ordering is ordinal-day order, which also
/// stays correct across table revisions that change relative month lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get() + 1", "day.get()")]
pub struct NepaliDate {
    year: types::Year,
    month: types::MonthIndex,
    day: types::Day,
}

impl NepaliDate {
    /// Creates a date from explicit parts; `month_index` is zero-based
    /// (0 = Baishakh).
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` for a year outside the table,
    /// `DateError::InvalidMonth` for a month index outside `0..=11`, and
    /// `DateError::InvalidDay` for a day beyond the month's length.
    pub fn new(year: u16, month_index: u8, day: u8) -> Result<Self, DateError> {
        let year = types::Year::new(year)?;
        let month = types::MonthIndex::new(month_index)?;
        let day = types::Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// The BS date of the given AD date.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` when the date falls outside table
    /// coverage.
    pub fn from_ad(ad: AdDate) -> Result<Self, DateError> {
        let (year, month_index, day) = convert::ad_to_bs(ad)?;
        Self::new(year, month_index, day)
    }

    /// The BS date containing the given Unix timestamp (seconds), flooring
    /// sub-day remainders toward the earlier day.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` when the timestamp falls outside
    /// table coverage.
    pub fn from_timestamp(secs: i64) -> Result<Self, DateError> {
        Self::from_ad(AdDate::from_timestamp(secs))
    }

    /// Today's BS date from the system clock; the one wall-clock entry point
    /// of the crate.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the clock reads outside table
    /// coverage, `DateError::InvariantViolation` if it is unrepresentable.
    pub fn today() -> Result<Self, DateError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| DateError::InvariantViolation("system clock before the Unix epoch"))?;
        let secs = i64::try_from(now.as_secs())
            .map_err(|_| DateError::InvariantViolation("system clock beyond representable range"))?;
        Self::from_timestamp(secs)
    }

    /// Returns the BS year.
    pub fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the zero-based month index (0 = Baishakh).
    pub fn month_index(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day of month, `1..=32`.
    pub fn day(&self) -> u8 {
        self.day.get()
    }

    /// `(year, month_index, day)` in one call.
    pub fn to_parts(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }

    pub(crate) fn year_typed(&self) -> types::Year {
        self.year
    }

    /// The AD date of the same physical day. Infallible: every table date
    /// has an AD equivalent.
    pub fn to_ad(&self) -> AdDate {
        AdDate::from_jdn(convert::REF_AD_JDN + self.ordinal())
    }

    /// Weekday of the date, `0..=6` with 0 = Sunday.
    pub fn weekday(&self) -> u8 {
        self.to_ad().weekday()
    }

    /// Days from the reference point; the canonical intermediate value both
    /// conversion directions share.
    fn ordinal(&self) -> i64 {
        convert::ordinal_of(self.year, self.month, self.day)
    }

    /// The date `n` days later, correct across month and year boundaries.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` when the result leaves the table.
    pub fn add_days(&self, n: i64) -> Result<Self, DateError> {
        let (year, month_index, day) = convert::from_ordinal(self.ordinal() + n)?;
        Self::new(year, month_index, day)
    }

    /// The date `n` days earlier.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` when the result leaves the table.
    pub fn subtract_days(&self, n: i64) -> Result<Self, DateError> {
        self.add_days(-n)
    }

    /// Whole days from `other` to `self`; positive when `self` is later.
    pub fn diff_days(&self, other: &Self) -> i64 {
        self.ordinal() - other.ordinal()
    }

    /// Whether `self` is earlier than `other` in calendar order.
    pub fn before(&self, other: &Self) -> bool {
        self.ordinal() < other.ordinal()
    }

    /// Whether `self` is later than `other` in calendar order.
    pub fn after(&self, other: &Self) -> bool {
        self.ordinal() > other.ordinal()
    }

    /// Field-wise equality, same as `==`.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Renders the date through the token formatter; see [`FormatOptions`].
    ///
    /// # Errors
    /// Returns `DateError::InvariantViolation` only on an internal name-table
    /// bug; never fails for a validated date and a well-formed pattern.
    pub fn format(&self, options: &FormatOptions<'_>) -> Result<String, DateError> {
        let parts = match options.calendar {
            Calendar::Bs => format::DateParts::bs(
                self.year.get(),
                self.month.get(),
                self.day.get(),
                self.weekday(),
                options.locale,
            ),
            Calendar::Ad => format::DateParts::ad(self.to_ad(), options.locale),
        };
        format::render(&parts, options.format, options.locale)
    }
}

/// Splits a delimited date string into its three numeric groups. Accepts `-`
/// or `/` as the separator, but not a mixture.
pub(crate) fn split_date_string(s: &str) -> Result<(i32, i32, i32), DateError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(DateError::InvalidInput("empty date string".to_owned()));
    }

    let has_hyphen = trimmed.contains(DATE_SEPARATOR);
    let has_slash = trimmed.contains(SLASH_SEPARATOR);
    let separator = match (has_hyphen, has_slash) {
        (true, true) => {
            return Err(DateError::InvalidInput(format!(
                "mixed {DATE_SEPARATOR} and {SLASH_SEPARATOR} separators: {trimmed}"
            )));
        }
        (true, false) => DATE_SEPARATOR,
        (false, true) => SLASH_SEPARATOR,
        (false, false) => {
            return Err(DateError::InvalidInput(format!(
                "no date separator found: {trimmed}"
            )));
        }
    };

    let parts: Vec<&str> = trimmed.split(separator).map(str::trim).collect();
    if parts.len() != 3 {
        return Err(DateError::InvalidInput(format!(
            "expected 3 date components, found {}: {trimmed}",
            parts.len()
        )));
    }
    let mut numbers = [0i32; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse::<i32>()
            .map_err(|_| DateError::InvalidInput(format!("non-numeric component {part:?}")))?;
    }
    Ok((numbers[0], numbers[1], numbers[2]))
}

impl FromStr for NepaliDate {
    type Err = DateError;

    /// Parses `YYYY-MM-DD` or `DD-MM-YYYY` (with `-` or `/`), month
    /// **1-based** as written. Only unambiguous layouts are accepted: the
    /// year must be the one group exceeding 31, so two-digit years are never
    /// guessed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, month1, last) = split_date_string(s)?;
        let (year, day) = if first > 31 {
            (first, last)
        } else if last > 31 {
            (last, first)
        } else {
            return Err(DateError::InvalidInput(format!(
                "ambiguous date string (no 4-digit year): {s}"
            )));
        };
        let year = u16::try_from(year)
            .map_err(|_| DateError::InvalidInput(format!("year out of range: {s}")))?;
        let month_index = u8::try_from(month1)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .ok_or_else(|| DateError::InvalidInput(format!("month out of range: {s}")))?;
        let day = u8::try_from(day)
            .map_err(|_| DateError::InvalidInput(format!("day out of range: {s}")))?;
        Self::new(year, month_index, day)
    }
}

impl TryFrom<(u16, u8, u8)> for NepaliDate {
    type Error = DateError;

    /// BS parts as a tuple; month zero-based like [`NepaliDate::new`].
    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl TryFrom<AdDate> for NepaliDate {
    type Error = DateError;

    fn try_from(value: AdDate) -> Result<Self, Self::Error> {
        Self::from_ad(value)
    }
}

impl From<NepaliDate> for AdDate {
    fn from(date: NepaliDate) -> Self {
        date.to_ad()
    }
}

impl PartialOrd for NepaliDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NepaliDate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ordinal-day order is authoritative, not lexical field order.
        self.ordinal().cmp(&other.ordinal())
    }
}

impl serde::Serialize for NepaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for NepaliDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
