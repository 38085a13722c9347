//! Strict date parsing for note titles.
//!
//! Patterns use moment-style tokens (`MMMM D, YYYY`, `YYYY-MM-DD`, ...). A title only
//! parses when it matches a whole pattern: exact digit widths, full (or three-letter)
//! month names, and a calendar-valid day. Nothing is guessed.

use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use strum_macros::EnumString;

/// Common regional layouts tried after the configured primary format.
pub const FALLBACK_FORMATS: &[&str] = &[
    "MMMM D, YYYY", // February 6, 2025
    "MMM D, YYYY",  // Feb 6, 2025
    "MM/DD/YYYY",   // 02/06/2025
    "M/D/YYYY",     // 2/6/2025
    "YYYY-MM-DD",   // 2025-02-06
    "D MMMM YYYY",  // 6 February 2025
    "D MMM YYYY",   // 6 Feb 2025
    "DD/MM/YYYY",   // 06/02/2025
    "D/M/YYYY",     // 6/2/2025
    "DD-MM-YYYY",   // 06-02-2025
    "D-MM-YYYY",    // 6-02-2025
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Longest tokens first so `MMMM` is never read as `MM` + `MM`.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[[^\]]*\]|YYYY|MMMM|MMM|MM|M|dddd|ddd|Do|DD|D").expect("valid token regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
enum Field {
    #[strum(serialize = "YYYY")]
    Year,
    #[strum(serialize = "MMMM")]
    MonthName,
    #[strum(serialize = "MMM")]
    MonthShort,
    #[strum(serialize = "MM")]
    MonthPadded,
    #[strum(serialize = "M")]
    Month,
    #[strum(serialize = "DD")]
    DayPadded,
    #[strum(serialize = "D")]
    Day,
    /// Day with its English ordinal suffix: 1st, 2nd, 23rd, 11th.
    #[strum(serialize = "Do")]
    DayOrdinal,
    #[strum(serialize = "dddd")]
    WeekdayName,
    #[strum(serialize = "ddd")]
    WeekdayShort,
}

impl Field {
    fn capture_pattern(self) -> String {
        match self {
            Field::Year => "([0-9]{4})".to_string(),
            Field::MonthName => format!("((?i:{}))", MONTH_NAMES.join("|")),
            Field::MonthShort => {
                let short: Vec<&str> = MONTH_NAMES.iter().map(|m| &m[..3]).collect();
                format!("((?i:{}))", short.join("|"))
            }
            Field::MonthPadded | Field::DayPadded => "([0-9]{2})".to_string(),
            Field::Month | Field::Day => "([0-9]{1,2})".to_string(),
            Field::DayOrdinal => "([0-9]{1,2}(?:st|nd|rd|th))".to_string(),
            Field::WeekdayName => format!("((?i:{}))", WEEKDAY_NAMES.join("|")),
            Field::WeekdayShort => {
                let short: Vec<&str> = WEEKDAY_NAMES.iter().map(|d| &d[..3]).collect();
                format!("((?i:{}))", short.join("|"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Field(Field),
    Literal(String),
}

/// A single compiled date pattern, e.g. `MMMM D, YYYY`.
#[derive(Debug, Clone)]
pub struct DateFormat {
    pattern: String,
    pieces: Vec<Piece>,
    matcher: Regex,
}

impl DateFormat {
    /// Compiles `pattern`. Fails when the pattern can't identify a full date (it needs a
    /// year, a month and a day token), has an unterminated `[` escape, or leaves letters
    /// outside `[...]` that are not tokens.
    pub fn new(pattern: &str) -> Result<Self> {
        let pieces = tokenize(pattern)?;

        let has = |wanted: &[Field]| {
            pieces
                .iter()
                .any(|p| matches!(p, Piece::Field(f) if wanted.contains(f)))
        };
        if !has(&[Field::Year]) {
            bail!("date format '{pattern}' has no year token (YYYY)");
        }
        if !has(&[
            Field::MonthName,
            Field::MonthShort,
            Field::MonthPadded,
            Field::Month,
        ]) {
            bail!("date format '{pattern}' has no month token (MMMM, MMM, MM or M)");
        }
        if !has(&[Field::DayPadded, Field::Day, Field::DayOrdinal]) {
            bail!("date format '{pattern}' has no day token (DD, Do or D)");
        }

        let mut source = String::from("^");
        for piece in &pieces {
            match piece {
                Piece::Field(field) => source.push_str(&field.capture_pattern()),
                Piece::Literal(text) => source.push_str(&regex::escape(text)),
            }
        }
        source.push('$');
        let matcher = Regex::new(&source)?;

        Ok(Self {
            pattern: pattern.to_string(),
            pieces,
            matcher,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Strictly parses `s` against this pattern alone.
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        let caps = self.matcher.captures(s)?;

        let mut year: Option<i32> = None;
        let mut month: Option<u32> = None;
        let mut day: Option<u32> = None;
        let mut weekday: Option<Weekday> = None;

        let fields = self.pieces.iter().filter_map(|p| match p {
            Piece::Field(f) => Some(*f),
            Piece::Literal(_) => None,
        });
        for (i, field) in fields.enumerate() {
            let text = caps.get(i + 1)?.as_str();
            match field {
                Field::Year => set_once(&mut year, text.parse().ok()?)?,
                Field::MonthName => set_once(&mut month, month_from_name(text, false)?)?,
                Field::MonthShort => set_once(&mut month, month_from_name(text, true)?)?,
                Field::MonthPadded | Field::Month => set_once(&mut month, text.parse().ok()?)?,
                Field::DayPadded | Field::Day => set_once(&mut day, text.parse().ok()?)?,
                Field::DayOrdinal => {
                    let digits = text.trim_end_matches(|c: char| c.is_ascii_alphabetic());
                    let n: u32 = digits.parse().ok()?;
                    if &text[digits.len()..] != ordinal_suffix(n) {
                        return None;
                    }
                    set_once(&mut day, n)?
                }
                Field::WeekdayName | Field::WeekdayShort => {
                    set_once(&mut weekday, Weekday::from_str(text).ok()?)?
                }
            }
        }

        let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;
        match weekday {
            Some(wd) if wd != date.weekday() => None,
            _ => Some(date),
        }
    }

    /// Renders `date` with this pattern.
    pub fn format(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field(field) => {
                    let month_name = MONTH_NAMES[date.month0() as usize];
                    let weekday_name = WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize];
                    let rendered = match field {
                        Field::Year => format!("{:04}", date.year()),
                        Field::MonthName => month_name.to_string(),
                        Field::MonthShort => month_name[..3].to_string(),
                        Field::MonthPadded => format!("{:02}", date.month()),
                        Field::Month => date.month().to_string(),
                        Field::DayPadded => format!("{:02}", date.day()),
                        Field::Day => date.day().to_string(),
                        Field::DayOrdinal => {
                            format!("{}{}", date.day(), ordinal_suffix(date.day()))
                        }
                        Field::WeekdayName => weekday_name.to_string(),
                        Field::WeekdayShort => weekday_name[..3].to_string(),
                    };
                    out.push_str(&rendered);
                }
            }
        }
        out
    }
}

/// The ordered candidate patterns used to read a title: the configured primary
/// format first, then [`FALLBACK_FORMATS`], without duplicates.
#[derive(Debug, Clone)]
pub struct DateFormatSpec {
    formats: Vec<DateFormat>,
}

impl DateFormatSpec {
    pub fn new(primary: &str) -> Result<Self> {
        let mut formats: Vec<DateFormat> = Vec::with_capacity(FALLBACK_FORMATS.len() + 1);
        for pattern in std::iter::once(primary).chain(FALLBACK_FORMATS.iter().copied()) {
            if formats.iter().any(|f| f.pattern == pattern) {
                continue;
            }
            formats.push(DateFormat::new(pattern)?);
        }
        Ok(Self { formats })
    }

    pub fn primary(&self) -> &DateFormat {
        &self.formats[0]
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(DateFormat::pattern)
    }

    /// Returns the first candidate's reading of `s`, or `None` when no candidate
    /// matches it completely.
    ///
    /// ```
    /// # use otd_core::dates::DateFormatSpec;
    /// # use chrono::Datelike;
    /// let spec = DateFormatSpec::new("MMMM D, YYYY").unwrap();
    ///
    /// let date = spec.parse_strict("February 6, 2025").unwrap();
    /// assert_eq!((date.year(), date.month0(), date.day()), (2025, 1, 6));
    ///
    /// // Not the primary format, but a US fallback.
    /// assert_eq!(spec.parse_strict("02/06/2025"), Some(date));
    /// assert_eq!(spec.parse_strict("February 6th, 2025"), None);
    /// ```
    pub fn parse_strict(&self, s: &str) -> Option<NaiveDate> {
        self.formats.iter().find_map(|f| f.parse(s))
    }

    pub fn is_valid_date_string(&self, s: &str) -> bool {
        self.parse_strict(s).is_some()
    }

    /// Whether both strings are dates falling on the same month and day, in any year.
    pub fn same_calendar_day(&self, a: &str, b: &str) -> bool {
        match (self.parse_strict(a), self.parse_strict(b)) {
            (Some(a), Some(b)) => CalendarKey::from(a) == CalendarKey::from(b),
            _ => false,
        }
    }
}

/// Month (0-based) and day of a date, ignoring the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarKey {
    pub month0: u32,
    pub day: u32,
}

impl From<NaiveDate> for CalendarKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            month0: date.month0(),
            day: date.day(),
        }
    }
}

/// Moves `date` into `year`. Feb 29 becomes Feb 28 when `year` isn't a leap year.
pub fn with_year_clamped(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
}

fn tokenize(pattern: &str) -> Result<Vec<Piece>> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in TOKEN_RE.find_iter(pattern) {
        if m.start() > last {
            push_literal(&mut pieces, &pattern[last..m.start()], pattern)?;
        }
        let token = m.as_str();
        if let Some(escaped) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if !escaped.is_empty() {
                pieces.push(Piece::Literal(escaped.to_string()));
            }
        } else {
            // The token regex only yields field names besides escapes.
            let field = Field::from_str(token)?;
            pieces.push(Piece::Field(field));
        }
        last = m.end();
    }
    if last < pattern.len() {
        push_literal(&mut pieces, &pattern[last..], pattern)?;
    }
    Ok(pieces)
}

fn push_literal(pieces: &mut Vec<Piece>, text: &str, pattern: &str) -> Result<()> {
    if text.contains('[') {
        bail!("date format '{pattern}' has an unterminated '[' escape");
    }
    if text.chars().any(|c| c.is_ascii_alphabetic()) {
        bail!("date format '{pattern}' has unknown token text '{text}' (escape it as [...])");
    }
    pieces.push(Piece::Literal(text.to_string()));
    Ok(())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn month_from_name(name: &str, short: bool) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| {
            let candidate = if short { &m[..3] } else { *m };
            candidate.eq_ignore_ascii_case(name)
        })
        .map(|i| i as u32 + 1)
}

/// Stores `value` unless the slot already holds a different one.
fn set_once<T: PartialEq>(slot: &mut Option<T>, value: T) -> Option<()> {
    match slot {
        Some(existing) if *existing != value => None,
        _ => {
            *slot = Some(value);
            Some(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> DateFormatSpec {
        DateFormatSpec::new("MMMM D, YYYY").unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn primary_format_is_not_duplicated() {
        let s = spec();
        let patterns: Vec<&str> = s.patterns().collect();
        assert_eq!(patterns.len(), FALLBACK_FORMATS.len());
        assert_eq!(patterns[0], "MMMM D, YYYY");
    }

    #[test]
    fn custom_primary_is_tried_first() {
        let s = DateFormatSpec::new("dddd, DD MMM YYYY").unwrap();
        let patterns: Vec<&str> = s.patterns().collect();
        assert_eq!(patterns.len(), FALLBACK_FORMATS.len() + 1);
        assert_eq!(s.primary().pattern(), "dddd, DD MMM YYYY");
        assert_eq!(s.parse_strict("Friday, 15 Aug 2025"), Some(ymd(2025, 8, 15)));
    }

    #[test]
    fn parses_long_month_names() {
        let d = spec().parse_strict("February 6, 2025").unwrap();
        assert_eq!(d.year(), 2025);
        assert_eq!(d.month0(), 1);
        assert_eq!(d.day(), 6);
    }

    #[test]
    fn numeric_title_falls_back_to_us_order() {
        let s = spec();
        assert!(s.primary().parse("02/06/2025").is_none());
        assert_eq!(s.parse_strict("02/06/2025"), Some(ymd(2025, 2, 6)));
    }

    #[test]
    fn eu_order_is_used_when_us_order_is_impossible() {
        assert_eq!(spec().parse_strict("25/12/2024"), Some(ymd(2024, 12, 25)));
        assert_eq!(spec().parse_strict("25-12-2024"), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn every_fallback_layout_is_understood() {
        let s = spec();
        let expected = ymd(2025, 2, 6);
        for title in [
            "Feb 6, 2025",
            "2/6/2025",
            "2025-02-06",
            "6 February 2025",
            "6 Feb 2025",
            "6-02-2025",
        ] {
            assert_eq!(s.parse_strict(title), Some(expected), "{title}");
        }
    }

    #[test]
    fn month_names_ignore_case() {
        assert_eq!(spec().parse_strict("february 6, 2025"), Some(ymd(2025, 2, 6)));
    }

    #[test]
    fn strict_parsing_rejects_near_misses() {
        let s = spec();
        for title in [
            "February 6 2025",
            "February 6, 25",
            "Febr 6, 2025",
            "February 6, 2025 notes",
            " February 6, 2025",
            "2025-2-6",
            "February 30, 2025",
            "13/13/2025",
            "Meeting notes",
            "",
        ] {
            assert!(s.parse_strict(title).is_none(), "{title}");
        }
    }

    #[test]
    fn leap_day_only_in_leap_years() {
        let s = spec();
        assert_eq!(s.parse_strict("February 29, 2024"), Some(ymd(2024, 2, 29)));
        assert!(s.parse_strict("February 29, 2025").is_none());
    }

    #[test]
    fn weekday_must_agree_with_date() {
        let s = DateFormatSpec::new("dddd, MMMM D, YYYY").unwrap();
        assert_eq!(
            s.parse_strict("Thursday, February 6, 2025"),
            Some(ymd(2025, 2, 6))
        );
        assert!(s.parse_strict("Monday, February 6, 2025").is_none());
    }

    #[test]
    fn escaped_text_is_literal() {
        let s = DateFormatSpec::new("[Day] D [of] MMMM YYYY").unwrap();
        assert_eq!(s.parse_strict("Day 6 of February 2025"), Some(ymd(2025, 2, 6)));
    }

    #[test]
    fn validity_agrees_with_parsing() {
        let s = spec();
        for title in ["February 6, 2025", "02/06/2025", "nope", "February 29, 2023"] {
            assert_eq!(s.is_valid_date_string(title), s.parse_strict(title).is_some());
        }
    }

    #[test]
    fn same_calendar_day_ignores_year() {
        let s = spec();
        assert!(s.same_calendar_day("February 6, 2025", "February 6, 2019"));
        assert!(s.same_calendar_day("February 6, 2019", "2025-02-06"));
        assert!(!s.same_calendar_day("February 6, 2025", "February 7, 2025"));
        assert!(!s.same_calendar_day("February 6, 2025", "not a date"));
    }

    #[test]
    fn formats_round_trip_through_the_pattern() {
        let f = DateFormat::new("MMMM D, YYYY").unwrap();
        assert_eq!(f.format(ymd(2021, 3, 4)), "March 4, 2021");
        let f = DateFormat::new("ddd DD/MM/YYYY").unwrap();
        assert_eq!(f.format(ymd(2021, 3, 4)), "Thu 04/03/2021");
    }

    #[test]
    fn rejects_incomplete_patterns() {
        assert!(DateFormat::new("MMMM D").is_err());
        assert!(DateFormat::new("YYYY-MM").is_err());
        assert!(DateFormat::new("MMMM YYYY").is_err());
        assert!(DateFormat::new("[D MMMM YYYY").is_err());
        assert!(DateFormatSpec::new("D MMMM").is_err());
    }

    #[test]
    fn ordinal_days_parse_and_format() {
        let s = DateFormatSpec::new("MMMM Do, YYYY").unwrap();
        assert_eq!(s.parse_strict("February 6th, 2025"), Some(ymd(2025, 2, 6)));
        assert_eq!(s.parse_strict("March 1st, 2025"), Some(ymd(2025, 3, 1)));
        assert_eq!(s.parse_strict("March 22nd, 2025"), Some(ymd(2025, 3, 22)));
        assert_eq!(s.parse_strict("March 13th, 2025"), Some(ymd(2025, 3, 13)));

        let f = s.primary();
        assert_eq!(f.format(ymd(2024, 2, 6)), "February 6th, 2024");
        assert_eq!(f.format(ymd(2024, 2, 23)), "February 23rd, 2024");
        assert_eq!(f.format(ymd(2024, 2, 11)), "February 11th, 2024");
        assert_eq!(f.format(ymd(2024, 2, 21)), "February 21st, 2024");
    }

    #[test]
    fn ordinal_suffix_must_match_the_day() {
        let s = DateFormatSpec::new("MMMM Do, YYYY").unwrap();
        for title in [
            "February 6o, 2025",
            "February 6st, 2025",
            "February 11st, 2025",
            "February 6, 2025th",
            "February 6TH, 2025",
        ] {
            assert!(s.primary().parse(title).is_none(), "{title}");
        }
    }

    #[test]
    fn stray_letters_in_a_pattern_are_rejected() {
        assert!(DateFormat::new("MMMM Dx, YYYY").is_err());
        assert!(DateFormat::new("YYYY-MM-DD hh").is_err());
        assert!(DateFormatSpec::new("MMMM Do, YYYY").is_ok());
        assert!(DateFormat::new("[Week of] MMMM D, YYYY").is_ok());
    }

    #[test]
    fn year_change_clamps_leap_day() {
        let leap = ymd(2024, 2, 29);
        assert_eq!(with_year_clamped(leap, 2020), Some(ymd(2020, 2, 29)));
        assert_eq!(with_year_clamped(leap, 2023), Some(ymd(2023, 2, 28)));
        assert_eq!(with_year_clamped(ymd(2024, 6, 1), 2019), Some(ymd(2019, 6, 1)));
    }
}
