//! Weekday-aligned month grids for rendering a BS calendar year.

use crate::consts::{BS_MONTHS_EN, BS_MONTHS_NE, MAX_YEAR, MIN_YEAR, MONTHS_PER_YEAR};
use crate::format;
use crate::table;
use crate::types::{MonthIndex, Year};
use crate::{AdDate, DateError, NepaliDate};

/// One day cell of a [`MonthGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCell {
    /// BS day of month, `1..=32`.
    pub day: u8,
    /// Day-of-month of the same physical day on the AD calendar.
    pub ad_day: u8,
    /// Devanagari label for the BS day number.
    pub label: String,
    pub date: NepaliDate,
}

/// A month rendered as a whole number of Sunday-started weeks. Cells are
/// `None` before day 1 (as many as the AD weekday index of day 1) and after
/// the last day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub name_en: &'static str,
    pub name_ne: &'static str,
    /// The AD months the BS month overlaps, e.g. `"Apr/May"`.
    pub ad_span: String,
    pub cells: Vec<Option<MonthCell>>,
}

impl MonthGrid {
    /// Number of real (non-padding) day cells.
    pub fn day_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// The grid as Sunday-started weeks.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<MonthCell>]> {
        self.cells.chunks(7)
    }
}

/// A BS calendar year with lazily built, cached month grids.
///
/// The cache is exclusive state of one value; building and reading grids
/// takes `&mut self`, so sharing across threads requires external
/// serialization by construction.
#[derive(Debug, Clone)]
pub struct NepaliCalendar {
    year: Year,
    months: [Option<MonthGrid>; 12],
}

impl NepaliCalendar {
    /// Creates a calendar for the given BS year.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` for a year outside the table.
    pub fn new(year: u16) -> Result<Self, DateError> {
        Ok(Self {
            year: Year::new(year)?,
            months: std::array::from_fn(|_| None),
        })
    }

    /// Calendar for the BS year containing today (system clock).
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if today falls outside the table.
    pub fn current() -> Result<Self, DateError> {
        Self::new(NepaliDate::today()?.year())
    }

    /// Calendar for the year of the given date.
    pub fn from_date(date: &NepaliDate) -> Self {
        Self {
            year: date.year_typed(),
            months: std::array::from_fn(|_| None),
        }
    }

    /// The BS year this calendar covers.
    pub fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the grid for one month, building and caching it on first use.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` for an index outside `0..=11`.
    pub fn get_month(&mut self, month_index: u8) -> Result<&MonthGrid, DateError> {
        let month = MonthIndex::new(month_index)?;
        let slot = usize::from(month.get());
        if self.months[slot].is_none() {
            let grid = self.build_month(month)?;
            self.months[slot] = Some(grid);
        }
        self.months[slot]
            .as_ref()
            .ok_or(DateError::InvariantViolation("month cache slot empty after fill"))
    }

    /// All twelve month grids in order.
    ///
    /// # Errors
    /// Propagates any grid-construction failure; impossible for a validated
    /// year.
    pub fn get_all_months(&mut self) -> Result<Vec<&MonthGrid>, DateError> {
        for m in 0..MONTHS_PER_YEAR {
            self.get_month(m)?;
        }
        let mut grids = Vec::with_capacity(usize::from(MONTHS_PER_YEAR));
        for grid in self.months.iter().flatten() {
            grids.push(grid);
        }
        Ok(grids)
    }

    /// AD year in which the given BS month begins.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` for an index outside `0..=11`.
    pub fn ad_year_of_month(&mut self, month_index: u8) -> Result<i32, DateError> {
        let grid = self.get_month(month_index)?;
        let first = grid
            .cells
            .iter()
            .flatten()
            .next()
            .ok_or(DateError::InvariantViolation("month grid has no day cells"))?;
        Ok(first.date.to_ad().year())
    }

    /// Whether the given date falls in this calendar's year. Pass the value
    /// from [`NepaliDate::today`] for wall-clock behavior.
    pub fn is_current_year(&self, today: &NepaliDate) -> bool {
        today.year() == self.year.get()
    }

    /// The month grid containing the given date, or `None` when the date is
    /// in another year.
    ///
    /// # Errors
    /// Propagates grid-construction failures; impossible for a valid date.
    pub fn current_month(&mut self, today: &NepaliDate) -> Result<Option<&MonthGrid>, DateError> {
        if !self.is_current_year(today) {
            return Ok(None);
        }
        self.get_month(today.month_index()).map(Some)
    }

    /// Calendar for the following year.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` at the end of the table.
    pub fn next_year(&self) -> Result<Self, DateError> {
        Self::new(self.year.get() + 1)
    }

    /// Calendar for the preceding year.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` at the start of the table.
    pub fn prev_year(&self) -> Result<Self, DateError> {
        Self::new(self.year.get() - 1)
    }

    pub fn can_go_next(&self) -> bool {
        self.year.get() < MAX_YEAR
    }

    pub fn can_go_prev(&self) -> bool {
        self.year.get() > MIN_YEAR
    }

    /// Drops every cached grid. Only useful if a caller wants to bound
    /// memory; grids are rebuilt on demand.
    pub fn clear_cache(&mut self) {
        self.months = std::array::from_fn(|_| None);
    }

    fn build_month(&self, month: MonthIndex) -> Result<MonthGrid, DateError> {
        let year = self.year.get();
        let days_in_month = table::month_length_of(self.year, month);

        let first = NepaliDate::new(year, month.get(), 1)?;
        let leading = usize::from(first.weekday());

        let mut cells: Vec<Option<MonthCell>> =
            Vec::with_capacity(leading + usize::from(days_in_month) + 6);
        cells.resize(leading, None);

        for day in 1..=days_in_month {
            let date = NepaliDate::new(year, month.get(), day)?;
            let ad = date.to_ad();
            cells.push(Some(MonthCell {
                day,
                ad_day: ad.day(),
                label: format::transliterate_digits(&day.to_string()),
                date,
            }));
        }
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        let last_ad = first.to_ad() + i64::from(days_in_month - 1);
        let month_idx = usize::from(month.get());
        Ok(MonthGrid {
            name_en: BS_MONTHS_EN[month_idx],
            name_ne: BS_MONTHS_NE[month_idx],
            ad_span: ad_span(first.to_ad(), last_ad),
            cells,
        })
    }
}

/// `"Apr/May"`-style label for the AD months a BS month overlaps.
fn ad_span(first: AdDate, last: AdDate) -> String {
    let months = crate::consts::AD_MONTHS_ABBR_EN;
    let a = months[usize::from(first.month_index())];
    let b = months[usize::from(last.month_index())];
    if a == b { a.to_owned() } else { format!("{a}/{b}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_year() {
        assert!(NepaliCalendar::new(2079).is_ok());
        assert!(matches!(
            NepaliCalendar::new(MIN_YEAR - 1),
            Err(DateError::OutOfRange(_))
        ));
        assert!(matches!(
            NepaliCalendar::new(MAX_YEAR + 1),
            Err(DateError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_grid_completeness() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        for month in 0..12 {
            let expected_days = usize::from(table::month_length(2079, month).unwrap());
            let first_weekday =
                usize::from(NepaliDate::new(2079, month, 1).unwrap().weekday());
            let grid = calendar.get_month(month).unwrap();

            assert_eq!(grid.day_count(), expected_days, "month {month}");
            let leading = grid.cells.iter().take_while(|c| c.is_none()).count();
            assert_eq!(leading, first_weekday, "month {month}");
            assert_eq!(grid.cells.len() % 7, 0, "month {month}");
        }
    }

    #[test]
    fn test_grid_cells_in_order() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let grid = calendar.get_month(0).unwrap();
        let days: Vec<u8> = grid.cells.iter().flatten().map(|c| c.day).collect();
        let expected: Vec<u8> = (1..=31).collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn test_grid_ad_days_follow_calendar() {
        // Baishakh 2079 starts 14 April 2022.
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let grid = calendar.get_month(0).unwrap();
        let first = grid.cells.iter().flatten().next().unwrap();
        assert_eq!(first.ad_day, 14);
        assert_eq!(grid.ad_span, "Apr/May");
    }

    #[test]
    fn test_grid_labels_devanagari() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let grid = calendar.get_month(0).unwrap();
        let first = grid.cells.iter().flatten().next().unwrap();
        assert_eq!(first.label, "१");
    }

    #[test]
    fn test_cached_grid_is_reused() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let first_ptr: *const MonthGrid = calendar.get_month(3).unwrap();
        let second_ptr: *const MonthGrid = calendar.get_month(3).unwrap();
        assert_eq!(first_ptr, second_ptr);
    }

    #[test]
    fn test_clear_cache_rebuilds() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let before = calendar.get_month(0).unwrap().clone();
        calendar.clear_cache();
        assert_eq!(calendar.get_month(0).unwrap(), &before);
    }

    #[test]
    fn test_get_all_months() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let grids = calendar.get_all_months().unwrap();
        assert_eq!(grids.len(), 12);
        assert_eq!(grids[0].name_en, "Baishakh");
        assert_eq!(grids[11].name_en, "Chaitra");
    }

    #[test]
    fn test_invalid_month_index() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        assert!(matches!(
            calendar.get_month(12),
            Err(DateError::InvalidMonth(12))
        ));
    }

    #[test]
    fn test_year_navigation() {
        let calendar = NepaliCalendar::new(2079).unwrap();
        assert_eq!(calendar.next_year().unwrap().year(), 2080);
        assert_eq!(calendar.prev_year().unwrap().year(), 2078);

        let last = NepaliCalendar::new(MAX_YEAR).unwrap();
        assert!(!last.can_go_next());
        assert!(last.can_go_prev());
        assert!(matches!(last.next_year(), Err(DateError::OutOfRange(_))));

        let first = NepaliCalendar::new(MIN_YEAR).unwrap();
        assert!(!first.can_go_prev());
        assert!(matches!(first.prev_year(), Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn test_current_year_and_month_with_injected_today() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        let today = NepaliDate::new(2079, 10, 5).unwrap();
        assert!(calendar.is_current_year(&today));
        let grid = calendar.current_month(&today).unwrap().unwrap();
        assert_eq!(grid.name_en, "Falgun");

        let other_year = NepaliDate::new(2080, 0, 1).unwrap();
        assert!(!calendar.is_current_year(&other_year));
        assert!(calendar.current_month(&other_year).unwrap().is_none());
    }

    #[test]
    fn test_ad_year_of_month() {
        let mut calendar = NepaliCalendar::new(2079).unwrap();
        // Baishakh 2079 begins in April 2022; Magh begins in January 2023.
        assert_eq!(calendar.ad_year_of_month(0).unwrap(), 2022);
        assert_eq!(calendar.ad_year_of_month(9).unwrap(), 2023);
    }

    #[test]
    fn test_from_date() {
        let date = NepaliDate::new(2042, 4, 10).unwrap();
        let calendar = NepaliCalendar::from_date(&date);
        assert_eq!(calendar.year(), 2042);
    }
}
