//! Date range resolution for report-style command-line tools.
//!
//! A report command typically takes "a date or a number" plus a record count
//! and a frequency (daily, weekly, monthly), and needs either a single anchor
//! date or a bounding `[start, end]` window. This module turns those inputs
//! into calendar dates.
//!
//! Every resolver has an `_at` variant that takes the "now" instant
//! explicitly; the plain variants read `chrono::Utc::now()` and delegate.
//! "Today" is the calendar date of that instant in
//! [`ResolveOptions::timezone`].
//!
//! # Functions
//!
//! - [`resolve_anchor`] — A date, an offset, or a month name → one anchor date
//! - [`resolve_range`] — A literal date and a record count → `[start, end]`
//! - [`resolve_month_arg`] — A month name or "months ago" count → first of that month
//!
//! # Offset arithmetic
//!
//! Offsets always snap to the period boundary first and then step back whole
//! units: "2 weeks ago" is the week start of the current week minus 14 days,
//! never "today minus 14 days, then snapped".

use std::fmt;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zone used to decide what "today" is when no other zone is configured.
pub const DEFAULT_TIMEZONE: Tz = Tz::Asia__Shanghai;

// ── Configuration ───────────────────────────────────────────────────────────

/// Which day begins a week for snapping and week offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 standard (Monday = day 0 of the week).
    #[default]
    Monday,
    /// US/Canada convention (Sunday = day 0 of the week).
    Sunday,
}

/// Options shared by every resolver in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Which day starts the week.
    pub week_start: WeekStartDay,
    /// Zone in which the "now" instant is read as a calendar date.
    #[serde(with = "tz_name")]
    pub timezone: Tz,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStartDay::Monday,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl ResolveOptions {
    /// Replace the timezone with the IANA zone `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimezone`] if `name` is not a known IANA zone.
    pub fn with_timezone(mut self, name: &str) -> Result<Self> {
        self.timezone = parse_timezone(name)?;
        Ok(self)
    }

    /// Replace the day that starts the week.
    pub fn with_week_start(mut self, week_start: WeekStartDay) -> Self {
        self.week_start = week_start;
        self
    }
}

/// Serde adapter storing a [`Tz`] as its IANA name.
mod tz_name {
    use chrono_tz::Tz;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(tz.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tz, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse::<Tz>()
            .map_err(|_| D::Error::custom(format!("invalid timezone '{name}'")))
    }
}

// ── Frequency ───────────────────────────────────────────────────────────────

/// The unit that offsets are counted in and that dates snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Day,
    Week,
    Month,
    /// No frequency given. Resolvers fall back to today.
    #[default]
    Unspecified,
}

impl Frequency {
    /// Parse a frequency name leniently.
    ///
    /// Accepts `d`/`day`/`daily`, `w`/`week`/`weekly` and `m`/`month`/`monthly`
    /// in any case. Anything else, including the empty string, is
    /// [`Frequency::Unspecified`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" => Self::Day,
            "w" | "week" | "weekly" => Self::Week,
            "m" | "month" | "monthly" => Self::Month,
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Unspecified => "",
        };
        f.write_str(name)
    }
}

// ── DateSpec ────────────────────────────────────────────────────────────────

/// A parsed date argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    /// An explicit `YYYY-MM-DD` date.
    Literal(NaiveDate),
    /// "n units ago"; negative values point into the future.
    Offset(i64),
    /// A three-letter month mnemonic (1 = January).
    MonthName(u32),
}

impl DateSpec {
    /// Parse a date argument.
    ///
    /// - exactly 10 characters → strict `YYYY-MM-DD`
    /// - purely alphabetic → month mnemonic (`JAN`..`DEC`, any case)
    /// - anything else → signed integer offset
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDateFormat`], [`Error::UnrecognizedMonthToken`] or
    /// [`Error::InvalidNumericOffset`] for the three paths respectively.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.chars().count() == 10 {
            return parse_literal_date(s).map(Self::Literal);
        }

        if is_month_token(s) {
            return parse_month_token(s).map(Self::MonthName);
        }

        s.parse::<i64>().map(Self::Offset).map_err(|_| {
            Error::InvalidNumericOffset(format!(
                "'{s}': need a date in YYYY-MM-DD format or a number of past days/weeks/months"
            ))
        })
    }
}

// ── DateRange ───────────────────────────────────────────────────────────────

/// An inclusive date window. `start <= end` always holds for ranges built by
/// [`resolve_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.end)
    }
}

// ── resolve_anchor ──────────────────────────────────────────────────────────

/// Resolve a date argument to a single anchor date, using the system clock.
///
/// See [`resolve_anchor_at`].
pub fn resolve_anchor(
    spec: &str,
    frequency: Frequency,
    options: &ResolveOptions,
) -> Result<NaiveDate> {
    resolve_anchor_at(Utc::now(), spec, frequency, options)
}

/// Resolve a date argument to a single anchor date.
///
/// | spec        | Day           | Week                         | Month                         |
/// |-------------|---------------|------------------------------|-------------------------------|
/// | `n`         | today − n d   | week start of today − 7n d   | 1st of this month − n months  |
/// | date        | unchanged     | week start of date           | 1st of date's month           |
/// | month name  | 1st of month  | week start of the 1st        | 1st of month                  |
///
/// With [`Frequency::Unspecified`] the result is today, though `spec` must
/// still parse.
///
/// # Errors
///
/// Any [`DateSpec::parse`] error, or [`Error::OutOfRange`] if the offset
/// leaves the representable calendar.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cliutil::daterange::{resolve_anchor_at, Frequency, ResolveOptions};
///
/// // Wednesday, April 21 2021 in Asia/Shanghai
/// let now = Utc.with_ymd_and_hms(2021, 4, 21, 4, 0, 0).unwrap();
/// let anchor = resolve_anchor_at(now, "1", Frequency::Week, &ResolveOptions::default()).unwrap();
/// assert_eq!(anchor.to_string(), "2021-04-12");
/// ```
pub fn resolve_anchor_at(
    now: DateTime<Utc>,
    spec: &str,
    frequency: Frequency,
    options: &ResolveOptions,
) -> Result<NaiveDate> {
    let parsed = DateSpec::parse(spec)?;
    let today = local_today(now, options);

    let anchor = match (frequency, parsed) {
        (Frequency::Unspecified, _) => today,
        (_, DateSpec::Offset(n)) => offset_from_today(today, n, frequency, options)?,
        (_, DateSpec::Literal(date)) => snap_to_period_start(date, frequency, options)?,
        (_, DateSpec::MonthName(month)) => {
            let first = first_of_month(today.year(), month)?;
            snap_to_period_start(first, frequency, options)?
        }
    };
    let anchor = four_digit_year(anchor)?;

    debug!(spec, %frequency, %anchor, "resolved anchor date");
    Ok(anchor)
}

// ── resolve_range ───────────────────────────────────────────────────────────

/// Resolve a literal date and record count to a window, using the system clock.
///
/// See [`resolve_range_at`].
pub fn resolve_range(
    date: &str,
    nrecords: i64,
    frequency: Frequency,
    options: &ResolveOptions,
) -> Result<DateRange> {
    resolve_range_at(Utc::now(), date, nrecords, frequency, options)
}

/// Resolve a literal date and record count to an inclusive window ending in
/// the period that contains `date`.
///
/// With `n = max(nrecords - 1, 1)`:
///
/// - Day: `[date - n days, date]`
/// - Week: `[week start - 7n days, week end]`
/// - Month: `[1st of month - n months, last of month]`
///
/// When `nrecords <= 1` the window is just the period containing `date`.
/// With [`Frequency::Unspecified`] both bounds are today.
///
/// # Errors
///
/// [`Error::InvalidDateFormat`] unless `date` is a strict `YYYY-MM-DD` date;
/// offsets and month names are not accepted here. [`Error::OutOfRange`] if
/// either bound falls outside years 0000..=9999.
///
/// # Examples
///
/// ```
/// use cliutil::daterange::{resolve_range, Frequency, ResolveOptions};
///
/// let range = resolve_range("2021-01-02", 2, Frequency::Month, &ResolveOptions::default()).unwrap();
/// assert_eq!(range.start.to_string(), "2020-12-01");
/// assert_eq!(range.end.to_string(), "2021-01-31");
/// ```
pub fn resolve_range_at(
    now: DateTime<Utc>,
    date: &str,
    nrecords: i64,
    frequency: Frequency,
    options: &ResolveOptions,
) -> Result<DateRange> {
    let date = parse_literal_date(date.trim())?;
    let single = nrecords <= 1;
    let n = nrecords.saturating_sub(1).max(1);

    let range = match frequency {
        Frequency::Day => DateRange {
            start: if single { date } else { days_before(date, n)? },
            end: date,
        },
        Frequency::Week => {
            let start = start_of_week(date, options.week_start)?;
            DateRange {
                start: if single {
                    start
                } else {
                    days_before(start, weeks_to_days(n)?)?
                },
                end: end_of_week(date, options.week_start)?,
            }
        }
        Frequency::Month => {
            let start = start_of_month(date);
            DateRange {
                start: if single { start } else { months_before(start, n)? },
                end: end_of_month(date)?,
            }
        }
        Frequency::Unspecified => {
            let today = local_today(now, options);
            DateRange {
                start: today,
                end: today,
            }
        }
    };
    let range = DateRange {
        start: four_digit_year(range.start)?,
        end: four_digit_year(range.end)?,
    };

    debug!(%date, nrecords, %frequency, %range, "resolved date range");
    Ok(range)
}

// ── resolve_month_arg ───────────────────────────────────────────────────────

/// Resolve a month argument, using the system clock.
///
/// See [`resolve_month_arg_at`].
pub fn resolve_month_arg(arg: &str, options: &ResolveOptions) -> Result<Option<NaiveDate>> {
    resolve_month_arg_at(Utc::now(), arg, options)
}

/// Resolve a month argument to the first day of the month it names.
///
/// - empty → `None` (no month requested)
/// - `JAN`..`DEC` (any case) → that month in the current year
/// - integer `n` → the month `n` months before the current one
///
/// # Errors
///
/// [`Error::UnrecognizedMonthToken`] for other alphabetic input,
/// [`Error::InvalidNumericOffset`] for anything else that is not an integer.
pub fn resolve_month_arg_at(
    now: DateTime<Utc>,
    arg: &str,
    options: &ResolveOptions,
) -> Result<Option<NaiveDate>> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Ok(None);
    }

    let today = local_today(now, options);
    let resolved = if is_month_token(arg) {
        first_of_month(today.year(), parse_month_token(arg)?)?
    } else {
        let n: i64 = arg.parse().map_err(|_| {
            Error::InvalidNumericOffset(format!(
                "'{arg}': need a month like JAN or a number of past months (1 = last month)"
            ))
        })?;
        months_before(start_of_month(today), n)?
    };
    let resolved = four_digit_year(resolved)?;

    debug!(arg, %resolved, "resolved month argument");
    Ok(Some(resolved))
}

// ── Period boundaries ───────────────────────────────────────────────────────

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: WeekStartDay) -> Result<NaiveDate> {
    days_before(date, days_from_week_start(date.weekday(), week_start))
}

/// Last day of the week containing `date`.
pub fn end_of_week(date: NaiveDate, week_start: WeekStartDay) -> Result<NaiveDate> {
    days_before(date, days_from_week_start(date.weekday(), week_start) - 6)
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> Result<NaiveDate> {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|first_next| first_next.pred_opt())
        .ok_or_else(|| Error::OutOfRange(format!("end of month for {date}")))
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> i64 {
    match week_start {
        WeekStartDay::Monday => i64::from(weekday.num_days_from_monday()),
        WeekStartDay::Sunday => i64::from(weekday.num_days_from_sunday()),
    }
}

/// Calendar date of `now` in the configured zone.
fn local_today(now: DateTime<Utc>, options: &ResolveOptions) -> NaiveDate {
    now.with_timezone(&options.timezone).date_naive()
}

/// Step back `n` units from the period containing `today`.
fn offset_from_today(
    today: NaiveDate,
    n: i64,
    frequency: Frequency,
    options: &ResolveOptions,
) -> Result<NaiveDate> {
    match frequency {
        Frequency::Day => days_before(today, n),
        Frequency::Week => {
            let week_start = start_of_week(today, options.week_start)?;
            days_before(week_start, weeks_to_days(n)?)
        }
        Frequency::Month => months_before(start_of_month(today), n),
        Frequency::Unspecified => Ok(today),
    }
}

fn snap_to_period_start(
    date: NaiveDate,
    frequency: Frequency,
    options: &ResolveOptions,
) -> Result<NaiveDate> {
    match frequency {
        Frequency::Week => start_of_week(date, options.week_start),
        Frequency::Month => Ok(start_of_month(date)),
        Frequency::Day | Frequency::Unspecified => Ok(date),
    }
}

/// `date` minus `days`; a negative count moves forward.
fn days_before(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| Error::OutOfRange(format!("{date} minus {days} days")))
}

/// `date` minus `months` whole months; a negative count moves forward.
fn months_before(date: NaiveDate, months: i64) -> Result<NaiveDate> {
    let out_of_range = || Error::OutOfRange(format!("{date} minus {months} months"));
    let count = u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?;
    let shifted = if months >= 0 {
        date.checked_sub_months(Months::new(count))
    } else {
        date.checked_add_months(Months::new(count))
    };
    shifted.ok_or_else(out_of_range)
}

/// Resolved dates must print as `YYYY-MM-DD`, which holds for years 0..=9999.
fn four_digit_year(date: NaiveDate) -> Result<NaiveDate> {
    if (0..=9999).contains(&date.year()) {
        Ok(date)
    } else {
        Err(Error::OutOfRange(format!("{date} is outside years 0000..=9999")))
    }
}

fn weeks_to_days(weeks: i64) -> Result<i64> {
    weeks
        .checked_mul(7)
        .ok_or_else(|| Error::OutOfRange(format!("{weeks} weeks")))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::OutOfRange(format!("{year}-{month:02}-01")))
}

/// Parse a strict `YYYY-MM-DD` date.
fn parse_literal_date(s: &str) -> Result<NaiveDate> {
    let well_formed = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::InvalidDateFormat(format!(
            "'{s}': need a date in YYYY-MM-DD format"
        )));
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| Error::InvalidDateFormat(format!("'{s}': {e}")))
}

fn is_month_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// Map a three-letter month mnemonic (any case) to its number.
fn parse_month_token(s: &str) -> Result<u32> {
    let month = match s.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => {
            return Err(Error::UnrecognizedMonthToken(format!(
                "'{s}': expected a month like JAN, FEB, ... DEC"
            )));
        }
    };
    Ok(month)
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| Error::InvalidTimezone(format!("'{s}'")))
}

// ── Tests ───────────────────────────────────────────────────────────────────
