use crate::DateError;
use crate::consts::{MAX_MONTH_LENGTH, MAX_YEAR, MIN_DAY, MIN_YEAR, MONTHS_PER_YEAR};
use crate::table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::num::NonZeroU16;

/// A BS year guaranteed to lie inside the calendar table,
/// `MIN_YEAR..=MAX_YEAR`. Uses `NonZeroU16` internally; the table never
/// starts at year 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating it against the table range.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the value is outside
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        let non_zero = NonZeroU16::new(value).ok_or(DateError::OutOfRange(i32::from(value)))?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
            return Err(DateError::OutOfRange(i32::from(value)));
        }
        Ok(Self(non_zero))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Zero-based offset of this year into the calendar table.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - MIN_YEAR) as usize
    }
}

impl TryFrom<u16> for Year {
    type Error = DateError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A zero-based BS month index, `0..=11` (0 = Baishakh). Plain `u8`
/// internally since 0 is a legal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonthIndex(u8);

impl MonthIndex {
    /// Creates a new MonthIndex, validating that it's at most 11.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 12 or more.
    pub fn new(value: u8) -> Result<Self, DateError> {
        if value >= MONTHS_PER_YEAR {
            return Err(DateError::InvalidMonth(value));
        }
        Ok(Self(value))
    }

    /// Returns the month index as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MonthIndex {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthIndex> for u8 {
    fn from(month: MonthIndex) -> Self {
        month.0
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day of a BS month, validated against the month's length in the table.
/// Uses `NonZeroU8` internally, so 0 is not a valid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating it against the length of the given
    /// year and month.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is 0 or exceeds the
    /// month's length.
    pub fn new(value: u8, year: Year, month: MonthIndex) -> Result<Self, DateError> {
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidDay {
            year: i32::from(year.get()),
            month: month.get(),
            day: value,
        })?;

        let max_day = table::month_length_of(year, month);
        if value > max_day {
            return Err(DateError::InvalidDay {
                year: i32::from(year.get()),
                month: month.get(),
                day: value,
            });
        }

        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // Can't validate against a month length without year/month context,
        // so only the table-wide bounds apply here.
        if !(MIN_DAY..=MAX_MONTH_LENGTH).contains(&value) {
            return Err(DateError::InvalidDay {
                year: 0,
                month: 0,
                day: value,
            });
        }
        let non_zero = NonZeroU8::new(value).ok_or(DateError::InvalidDay {
            year: 0,
            month: 0,
            day: value,
        })?;
        Ok(Self(non_zero))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(MIN_YEAR).is_ok());
        assert!(Year::new(2079).is_ok());
        assert!(Year::new(MAX_YEAR).is_ok());
    }

    #[test]
    fn test_year_new_out_of_range() {
        assert!(matches!(Year::new(0), Err(DateError::OutOfRange(0))));
        assert!(matches!(
            Year::new(MIN_YEAR - 1),
            Err(DateError::OutOfRange(1969))
        ));
        assert!(matches!(
            Year::new(MAX_YEAR + 1),
            Err(DateError::OutOfRange(2101))
        ));
    }

    #[test]
    fn test_year_index() {
        assert_eq!(Year::new(MIN_YEAR).unwrap().index(), 0);
        assert_eq!(Year::new(1980).unwrap().index(), 10);
    }

    #[test]
    fn test_year_try_from_and_into() {
        let year: Year = 2079u16.try_into().unwrap();
        assert_eq!(year.get(), 2079);
        let raw: u16 = year.into();
        assert_eq!(raw, 2079);

        let result: Result<Year, _> = Year::try_from(1900u16);
        assert!(result.is_err());
    }

    #[test]
    fn test_year_display() {
        assert_eq!(Year::new(2079).unwrap().to_string(), "2079");
    }

    #[test]
    fn test_year_serde() {
        let year = Year::new(2079).unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "2079");
        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(year, parsed);

        let result: Result<Year, _> = serde_json::from_str("1901");
        assert!(result.is_err());
    }

    #[test]
    fn test_month_index_valid() {
        for m in 0..12 {
            assert!(MonthIndex::new(m).is_ok(), "month index {m} should be valid");
        }
    }

    #[test]
    fn test_month_index_invalid() {
        assert!(matches!(
            MonthIndex::new(12),
            Err(DateError::InvalidMonth(12))
        ));
        assert!(matches!(
            MonthIndex::new(255),
            Err(DateError::InvalidMonth(255))
        ));
    }

    #[test]
    fn test_month_index_serde() {
        let month = MonthIndex::new(0).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "0");
        let parsed: MonthIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(month, parsed);

        let result: Result<MonthIndex, _> = serde_json::from_str("12");
        assert!(result.is_err());
    }

    #[test]
    fn test_day_new_respects_table() {
        let year = Year::new(2079).unwrap();
        let month = MonthIndex::new(0).unwrap(); // Baishakh 2079 has 31 days
        assert!(Day::new(1, year, month).is_ok());
        assert!(Day::new(31, year, month).is_ok());
        assert!(matches!(
            Day::new(32, year, month),
            Err(DateError::InvalidDay {
                year: 2079,
                month: 0,
                day: 32
            })
        ));
    }

    #[test]
    fn test_day_new_zero() {
        let year = Year::new(2079).unwrap();
        let month = MonthIndex::new(0).unwrap();
        assert!(matches!(
            Day::new(0, year, month),
            Err(DateError::InvalidDay { day: 0, .. })
        ));
    }

    #[test]
    fn test_day_varies_with_month() {
        // Jestha 2079 has 32 days, Mangsir 2079 has 29.
        let year = Year::new(2079).unwrap();
        assert!(Day::new(32, year, MonthIndex::new(2).unwrap()).is_ok());
        assert!(Day::new(30, year, MonthIndex::new(7).unwrap()).is_err());
    }

    #[test]
    fn test_day_try_from_context_free() {
        let day: Day = 32u8.try_into().unwrap();
        assert_eq!(day.get(), 32);
        assert!(Day::try_from(0u8).is_err());
        assert!(Day::try_from(33u8).is_err());
    }

    #[test]
    fn test_day_display() {
        let year = Year::new(2079).unwrap();
        let month = MonthIndex::new(0).unwrap();
        assert_eq!(Day::new(15, year, month).unwrap().to_string(), "15");
    }
}
