//! Gregorian (AD) calendar dates, the conversion target of the BS side.
//!
//! Internally everything funnels through the Julian day number, so date
//! arithmetic and weekday lookups are plain integer math. Month indices are
//! zero-based to match the BS side; strings use 1-based months.

use crate::DateError;
use crate::consts::MONTHS_PER_YEAR;
use crate::prelude::*;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// JDN of the Unix epoch, 1970-01-01.
pub(crate) const UNIX_EPOCH_JDN: i64 = jdn_from_civil(1970, 1, 1);

const SECONDS_PER_DAY: i64 = 86_400;

/// Days in each Gregorian month, index 0 = January, February as non-leap.
const AD_MONTH_DAYS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const FEBRUARY_INDEX: u8 = 1;
const FEBRUARY_DAYS_LEAP: u8 = 29;

/// A Gregorian calendar date (proleptic for years before the reform).
///
/// Field order makes the derived ordering calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year", "month + 1", "day")]
pub struct AdDate {
    year: i32,
    month: u8,
    day: u8,
}

impl AdDate {
    /// Creates a new date, validating month index and day-of-month.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` for a month index outside `0..=11`
    /// and `DateError::InvalidDay` for a day invalid in that month.
    pub fn new(year: i32, month_index: u8, day: u8) -> Result<Self, DateError> {
        if month_index >= MONTHS_PER_YEAR {
            return Err(DateError::InvalidMonth(month_index));
        }
        if !(1..=days_in_month(year, month_index)).contains(&day) {
            return Err(DateError::InvalidDay {
                year,
                month: month_index,
                day,
            });
        }
        Ok(Self {
            year,
            month: month_index,
            day,
        })
    }

    /// Creates a date from a Julian day number.
    pub const fn from_jdn(jdn: i64) -> Self {
        let (year, month1, day) = civil_from_jdn(jdn);
        Self {
            year,
            month: month1 - 1,
            day,
        }
    }

    /// Creates a date from Unix seconds, flooring toward the earlier day.
    pub const fn from_timestamp(secs: i64) -> Self {
        Self::from_jdn(UNIX_EPOCH_JDN + secs.div_euclid(SECONDS_PER_DAY))
    }

    /// Returns the Julian day number of the date.
    pub const fn jdn(self) -> i64 {
        jdn_from_civil(self.year as i64, self.month as i64 + 1, self.day as i64)
    }

    /// Unix seconds at midnight UTC of the date.
    pub const fn timestamp(self) -> i64 {
        (self.jdn() - UNIX_EPOCH_JDN) * SECONDS_PER_DAY
    }

    /// Returns the year (astronomical numbering).
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the zero-based month index (0 = January).
    pub const fn month_index(self) -> u8 {
        self.month
    }

    /// Returns the day of month, `1..=31`.
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Returns the weekday, `0..=6` with 0 = Sunday.
    pub const fn weekday(self) -> u8 {
        (self.jdn() + 1).rem_euclid(7) as u8
    }

    /// `(year, month_index, day)` in one call.
    pub const fn to_parts(self) -> (i32, u8, u8) {
        (self.year, self.month, self.day)
    }
}

impl Add<i64> for AdDate {
    type Output = AdDate;

    fn add(self, days: i64) -> Self::Output {
        Self::from_jdn(self.jdn() + days)
    }
}

impl Sub<AdDate> for AdDate {
    type Output = i64;

    fn sub(self, rhs: AdDate) -> Self::Output {
        self.jdn() - rhs.jdn()
    }
}

impl FromStr for AdDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, month1, last) = crate::split_date_string(s)?;
        // Year position disambiguation: only unambiguous layouts are
        // accepted, two-digit years are never guessed.
        let (year, day) = if first > 31 {
            (first, last)
        } else if last > 31 {
            (last, first)
        } else {
            return Err(DateError::InvalidInput(format!(
                "ambiguous date string (no 4-digit year): {s}"
            )));
        };
        let month_index = u8::try_from(month1)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .ok_or_else(|| DateError::InvalidInput(format!("month out of range: {s}")))?;
        let day = u8::try_from(day)
            .map_err(|_| DateError::InvalidInput(format!("day out of range: {s}")))?;
        Self::new(year, month_index, day)
    }
}

impl serde::Serialize for AdDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for AdDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

pub(crate) const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) const fn days_in_month(year: i32, month_index: u8) -> u8 {
    if month_index == FEBRUARY_INDEX && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        AD_MONTH_DAYS[month_index as usize]
    }
}

/// Fliegel-Van Flandern JDN from a civil date, 1-based month. Truncating
/// division is load-bearing in the month/year offsets.
pub(crate) const fn jdn_from_civil(year: i64, month1: i64, day: i64) -> i64 {
    let a = (month1 - 14) / 12;
    (1461 * (year + 4800 + a)) / 4 + (367 * (month1 - 2 - 12 * a)) / 12
        - (3 * ((year + 4900 + a) / 100)) / 4
        + day
        - 32075
}

/// Inverse of [`jdn_from_civil`]; returns `(year, month1, day)`.
const fn civil_from_jdn(jdn: i64) -> (i32, u8, u8) {
    let f = jdn + 1401 + (((4 * jdn + 274_277) / 146_097) * 3) / 4 - 38;
    let e = 4 * f + 3;
    let g = (e % 1461) / 4;
    let h = 5 * g + 2;
    let day = (h % 153) / 5 + 1;
    let month1 = (h / 153 + 2) % 12 + 1;
    let year = e / 1461 - 4716 + (12 + 2 - month1) / 12;
    (year as i32, month1 as u8, day as u8)
}
