//! Token-substitution date rendering for both calendars.
//!
//! The vocabulary is `YYYY` `YY` `MM` `M` `DD` `D` `MMMM` `MMM` `dddd` `ddd`;
//! anything else in a pattern passes through as literal text, so separators
//! never need escaping. Matching is longest-token-first so `MMMM` is never
//! clobbered by `MM`.

use crate::DateError;
use crate::consts::{
    AD_MONTHS_ABBR_EN, AD_MONTHS_EN, AD_MONTHS_NE, BS_MONTHS_ABBR_EN, BS_MONTHS_EN, BS_MONTHS_NE,
    DEFAULT_FORMAT, NE_DIGITS, WEEKDAYS_ABBR_EN, WEEKDAYS_EN, WEEKDAYS_NE,
};
use crate::gregorian::AdDate;
use crate::prelude::*;

/// Output language for month/weekday names and digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum Locale {
    #[default]
    #[display(fmt = "en")]
    En,
    /// Nepali: Devanagari names and digits.
    #[display(fmt = "ne")]
    Ne,
}

/// Which calendar's fields a pattern is rendered from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum Calendar {
    #[default]
    #[display(fmt = "BS")]
    Bs,
    #[display(fmt = "AD")]
    Ad,
}

/// Options for [`NepaliDate::format`](crate::NepaliDate::format).
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    /// Token pattern, `YYYY-MM-DD` by default.
    pub format: &'a str,
    pub calendar: Calendar,
    pub locale: Locale,
}

impl Default for FormatOptions<'_> {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT,
            calendar: Calendar::default(),
            locale: Locale::default(),
        }
    }
}

/// Recognized tokens, longest first; order is what makes prefix matching
/// unambiguous.
const TOKENS: [&str; 10] = [
    "YYYY", "MMMM", "dddd", "MMM", "ddd", "YY", "MM", "DD", "M", "D",
];

/// One date reduced to the fields the renderer needs, with the name tables
/// already chosen for its calendar and locale.
pub(crate) struct DateParts {
    year: i32,
    month_index: u8,
    day: u8,
    weekday: u8,
    months: &'static [&'static str; 12],
    months_abbr: &'static [&'static str; 12],
    weekdays: &'static [&'static str; 7],
    weekdays_abbr: &'static [&'static str; 7],
}

impl DateParts {
    /// BS-side fields. The weekday is the weekday of the same physical day,
    /// taken from the AD equivalent.
    pub(crate) fn bs(year: u16, month_index: u8, day: u8, weekday: u8, locale: Locale) -> Self {
        let (months, months_abbr) = match locale {
            // Devanagari month names have no conventional 3-letter cut, so
            // the abbreviation tables repeat the full names.
            Locale::En => (&BS_MONTHS_EN, &BS_MONTHS_ABBR_EN),
            Locale::Ne => (&BS_MONTHS_NE, &BS_MONTHS_NE),
        };
        Self {
            year: i32::from(year),
            month_index,
            day,
            weekday,
            months,
            months_abbr,
            weekdays: weekday_names(locale),
            weekdays_abbr: weekday_abbrs(locale),
        }
    }

    pub(crate) fn ad(date: AdDate, locale: Locale) -> Self {
        let (months, months_abbr) = match locale {
            Locale::En => (&AD_MONTHS_EN, &AD_MONTHS_ABBR_EN),
            Locale::Ne => (&AD_MONTHS_NE, &AD_MONTHS_NE),
        };
        Self {
            year: date.year(),
            month_index: date.month_index(),
            day: date.day(),
            weekday: date.weekday(),
            months,
            months_abbr,
            weekdays: weekday_names(locale),
            weekdays_abbr: weekday_abbrs(locale),
        }
    }
}

fn weekday_names(locale: Locale) -> &'static [&'static str; 7] {
    match locale {
        Locale::En => &WEEKDAYS_EN,
        Locale::Ne => &WEEKDAYS_NE,
    }
}

fn weekday_abbrs(locale: Locale) -> &'static [&'static str; 7] {
    match locale {
        Locale::En => &WEEKDAYS_ABBR_EN,
        Locale::Ne => &WEEKDAYS_NE,
    }
}

/// Renders `pattern` over the given date fields.
///
/// # Errors
/// Returns `DateError::InvariantViolation` if a name lookup lands outside
/// its table; upstream validation makes that unreachable for any date this
/// crate constructs.
pub(crate) fn render(parts: &DateParts, pattern: &str, locale: Locale) -> Result<String, DateError> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while !rest.is_empty() {
        if let Some(token) = TOKENS.iter().copied().find(|t| rest.starts_with(t)) {
            expand(token, parts, &mut out)?;
            rest = &rest[token.len()..];
        } else if let Some(c) = rest.chars().next() {
            // Unknown text is literal, not an error.
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    match locale {
        Locale::En => Ok(out),
        Locale::Ne => Ok(transliterate_digits(&out)),
    }
}

fn expand(token: &str, parts: &DateParts, out: &mut String) -> Result<(), DateError> {
    let month = usize::from(parts.month_index);
    let weekday = usize::from(parts.weekday);
    let piece = match token {
        "YYYY" => format!("{:04}", parts.year),
        "YY" => format!("{:02}", parts.year.rem_euclid(100)),
        "MM" => format!("{:02}", parts.month_index + 1),
        "M" => (parts.month_index + 1).to_string(),
        "DD" => format!("{:02}", parts.day),
        "D" => parts.day.to_string(),
        "MMMM" => lookup(parts.months, month)?.to_owned(),
        "MMM" => lookup(parts.months_abbr, month)?.to_owned(),
        "dddd" => lookup(parts.weekdays, weekday)?.to_owned(),
        "ddd" => lookup(parts.weekdays_abbr, weekday)?.to_owned(),
        _ => return Err(DateError::InvariantViolation("unrecognized format token")),
    };
    out.push_str(&piece);
    Ok(())
}

fn lookup<const N: usize>(
    table: &'static [&'static str; N],
    index: usize,
) -> Result<&'static str, DateError> {
    table
        .get(index)
        .copied()
        .ok_or(DateError::InvariantViolation(
            "name table index beyond validated bounds",
        ))
}

/// Maps every ASCII digit to its Devanagari glyph; everything else is kept.
pub(crate) fn transliterate_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => NE_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bs() -> DateParts {
        // 2079 Falgun 5, a Friday (AD 2023-02-17).
        DateParts::bs(2079, 10, 5, 5, Locale::En)
    }

    #[test]
    fn test_numeric_tokens() {
        let parts = sample_bs();
        assert_eq!(render(&parts, "YYYY-MM-DD", Locale::En).unwrap(), "2079-11-05");
        assert_eq!(render(&parts, "YY/M/D", Locale::En).unwrap(), "79/11/5");
    }

    #[test]
    fn test_name_tokens() {
        let parts = sample_bs();
        assert_eq!(
            render(&parts, "D MMMM YYYY, dddd", Locale::En).unwrap(),
            "5 Falgun 2079, Friday"
        );
        assert_eq!(render(&parts, "MMM ddd", Locale::En).unwrap(), "Fal Fri");
    }

    #[test]
    fn test_longest_token_wins() {
        let parts = sample_bs();
        // MMMM must not be consumed as MM + MM.
        assert_eq!(render(&parts, "MMMM", Locale::En).unwrap(), "Falgun");
        assert_eq!(render(&parts, "MMM", Locale::En).unwrap(), "Fal");
        assert_eq!(render(&parts, "MMMMM", Locale::En).unwrap(), "Falgun11");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let parts = sample_bs();
        assert_eq!(
            render(&parts, "DD xx MM!", Locale::En).unwrap(),
            "05 xx 11!"
        );
    }

    #[test]
    fn test_ne_locale_digits_and_names() {
        let parts = DateParts::bs(2079, 10, 5, 5, Locale::Ne);
        assert_eq!(
            render(&parts, "YYYY-MM-DD", Locale::Ne).unwrap(),
            "२०७९-११-०५"
        );
        assert_eq!(render(&parts, "MMMM", Locale::Ne).unwrap(), "फाल्गुन");
        assert_eq!(render(&parts, "dddd", Locale::Ne).unwrap(), "शुक्रबार");
    }

    #[test]
    fn test_ne_locale_literal_digits_transliterated() {
        let parts = DateParts::bs(2079, 10, 5, 5, Locale::Ne);
        assert_eq!(render(&parts, "D@12", Locale::Ne).unwrap(), "५@१२");
    }

    #[test]
    fn test_ad_parts() {
        let date = AdDate::new(2023, 1, 16).unwrap(); // 16 Feb 2023, a Thursday
        let parts = DateParts::ad(date, Locale::En);
        assert_eq!(
            render(&parts, "dddd, MMMM D, YYYY", Locale::En).unwrap(),
            "Thursday, February 16, 2023"
        );
    }

    #[test]
    fn test_transliterate_digits() {
        assert_eq!(transliterate_digits("2079-11-05"), "२०७९-११-०५");
        assert_eq!(transliterate_digits("abc"), "abc");
    }

    #[test]
    fn test_lookup_out_of_bounds_is_invariant_violation() {
        let result = lookup(&WEEKDAYS_EN, 7);
        assert!(matches!(result, Err(DateError::InvariantViolation(_))));
    }
}
