//! Calendar arithmetic and Swedish date labels.
//!
//! Weeks start on Monday and the business week is Monday to Friday. Everything
//! here works on local wall-clock dates; there is no timezone handling.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};

use crate::models::SlotTime;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub const BUSINESS_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Column headers of the month grid, Monday first.
pub const DAY_HEADERS: [&str; 7] = ["Mån", "Tis", "Ons", "Tor", "Fre", "Lör", "Sön"];

const WEEKDAYS_LONG: [&str; 7] = [
    "måndag", "tisdag", "onsdag", "torsdag", "fredag", "lördag", "söndag",
];
const WEEKDAYS_SHORT: [&str; 7] = ["mån", "tis", "ons", "tors", "fre", "lör", "sön"];
const MONTHS_LONG: [&str; 12] = [
    "januari",
    "februari",
    "mars",
    "april",
    "maj",
    "juni",
    "juli",
    "augusti",
    "september",
    "oktober",
    "november",
    "december",
];
const MONTHS_SHORT: [&str; 12] = [
    "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.", "sep.", "okt.", "nov.",
    "dec.",
];

pub fn to_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
}

pub fn start_of_day(moment: NaiveDateTime) -> NaiveDate {
    moment.date()
}

pub fn add_days(date: NaiveDate, amount: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(amount))
        .unwrap_or(if amount < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Shifts by whole months, clamping the day to the length of the target month.
pub fn add_months(date: NaiveDate, amount: i32) -> NaiveDate {
    let months = Months::new(amount.unsigned_abs());
    let shifted = if amount < 0 {
        date.checked_sub_months(months)
    } else {
        date.checked_add_months(months)
    };
    shifted.unwrap_or(date)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let weekday = i64::from(date.weekday().num_days_from_sunday());
    let diff = if weekday == 0 { -6 } else { 1 - weekday };
    add_days(date, diff)
}

pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    add_days(start_of_week(date), 6)
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn is_business_day(date: NaiveDate) -> bool {
    BUSINESS_DAYS.contains(&date.weekday())
}

/// The given date if it is a business day, otherwise the first one after it.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut pointer = date;
    while !is_business_day(pointer) {
        pointer = add_days(pointer, 1);
    }
    pointer
}

/// Steps one day at a time in the direction of `step` until it lands on a
/// business day. Never returns `date` itself.
pub fn adjacent_business_day(date: NaiveDate, step: i64) -> NaiveDate {
    let step = if step < 0 { -1 } else { 1 };
    let mut candidate = add_days(date, step);
    while !is_business_day(candidate) {
        candidate = add_days(candidate, step);
    }
    candidate
}

pub fn slot_date_time(date: NaiveDate, time: SlotTime) -> NaiveDateTime {
    date.and_time(time.as_naive_time())
}

fn weekday_long(date: NaiveDate) -> &'static str {
    WEEKDAYS_LONG[date.weekday().num_days_from_monday() as usize]
}

fn weekday_short(date: NaiveDate) -> &'static str {
    WEEKDAYS_SHORT[date.weekday().num_days_from_monday() as usize]
}

fn month_long(date: NaiveDate) -> &'static str {
    MONTHS_LONG[date.month0() as usize]
}

fn month_short(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

/// `januari 2024`
pub fn format_month_year(date: NaiveDate) -> String {
    format!("{} {}", month_long(date), date.year())
}

/// `mån 1`
pub fn format_day_label(date: NaiveDate) -> String {
    format!("{} {}", weekday_short(date), date.day())
}

/// `måndag 1 januari 2024`
pub fn format_full_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        weekday_long(date),
        date.day(),
        month_long(date),
        date.year()
    )
}

/// `måndag 1 jan.`
pub fn format_card_date(date: NaiveDate) -> String {
    format!("{} {} {}", weekday_long(date), date.day(), month_short(date))
}

/// `1 jan.`
pub fn format_day_month(date: NaiveDate) -> String {
    format!("{} {}", date.day(), month_short(date))
}

/// `7 jan. 2024`
pub fn format_day_month_year(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_short(date), date.year())
}

pub fn capitalise(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
