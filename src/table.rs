//! Lookup contract over the static month-length table.

use crate::DateError;
use crate::consts::MIN_YEAR;
use crate::data::MONTH_DAYS;
use crate::types::{MonthIndex, Year};

/// Days in the given BS month.
///
/// # Errors
/// Returns `DateError::OutOfRange` for a year outside the table and
/// `DateError::InvalidMonth` for a month index outside `0..=11`.
pub fn month_length(year: u16, month_index: u8) -> Result<u8, DateError> {
    let year = Year::new(year)?;
    let month = MonthIndex::new(month_index)?;
    Ok(month_length_of(year, month))
}

/// Total days in the given BS year.
///
/// # Errors
/// Returns `DateError::OutOfRange` for a year outside the table.
pub fn year_length(year: u16) -> Result<u16, DateError> {
    let year = Year::new(year)?;
    Ok(year_length_of(year))
}

/// Table lookup for already-validated components. Infallible: `Year` and
/// `MonthIndex` can only hold in-range values.
pub(crate) fn month_length_of(year: Year, month: MonthIndex) -> u8 {
    MONTH_DAYS[year.index()][month.get() as usize]
}

pub(crate) fn year_length_of(year: Year) -> u16 {
    MONTH_DAYS[year.index()].iter().map(|&d| u16::from(d)).sum()
}

/// Zero-based table offset for a raw year, if covered.
pub(crate) fn year_index(year: u16) -> Option<usize> {
    year.checked_sub(MIN_YEAR)
        .map(usize::from)
        .filter(|&i| i < MONTH_DAYS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_YEAR;

    #[test]
    fn test_month_length_known_values() {
        // 2079 Baishakh has 31 days, Ashadh 32, Mangsir 29.
        assert_eq!(month_length(2079, 0).unwrap(), 31);
        assert_eq!(month_length(2079, 2).unwrap(), 32);
        assert_eq!(month_length(2079, 7).unwrap(), 29);
    }

    #[test]
    fn test_month_length_out_of_range_year() {
        assert!(matches!(
            month_length(MIN_YEAR - 1, 0),
            Err(DateError::OutOfRange(_))
        ));
        assert!(matches!(
            month_length(MAX_YEAR + 1, 0),
            Err(DateError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_month_length_invalid_month() {
        assert!(matches!(
            month_length(2079, 12),
            Err(DateError::InvalidMonth(12))
        ));
    }

    #[test]
    fn test_year_length_sums_months() {
        for year in [MIN_YEAR, 2000, 2079, MAX_YEAR] {
            let total: u16 = (0..12).map(|m| u16::from(month_length(year, m).unwrap())).sum();
            assert_eq!(year_length(year).unwrap(), total);
        }
    }

    #[test]
    fn test_year_length_out_of_range() {
        assert!(year_length(MIN_YEAR - 1).is_err());
    }

    #[test]
    fn test_year_index_bounds() {
        assert_eq!(year_index(MIN_YEAR), Some(0));
        assert_eq!(year_index(MAX_YEAR), Some(130));
        assert_eq!(year_index(MIN_YEAR - 1), None);
        assert_eq!(year_index(MAX_YEAR + 1), None);
        assert_eq!(year_index(0), None);
    }
}
