// Field-level helpers shared by the cleaner and the views: `NaN` sentinel
// detection, the `(min) ` marker in delivery times, Sunday-anchored week
// numbers, great-circle distance, group statistics and number formatting.
use chrono::{Datelike, NaiveDate};
use geo::{Distance, Haversine, Point};
use num_format::{Locale, ToFormattedString};
use std::str::FromStr;

/// Literal text the dataset uses in place of a missing value.
pub const MISSING: &str = "NaN";

/// Unit marker that precedes the minutes in `Time_taken(min)` values.
pub const MINUTES_MARKER: &str = "(min) ";

/// `true` when the trimmed value is the `NaN` sentinel or empty.
pub fn is_missing(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s == MISSING
}

/// Trimmed text, or `None` for the sentinel.
pub fn optional_text(s: &str) -> Option<String> {
    if is_missing(s) {
        None
    } else {
        Some(s.trim().to_string())
    }
}

/// Parse a value that may hold the sentinel.
///
/// - `Ok(None)` for the sentinel (or an empty cell).
/// - `Ok(Some(v))` for a well-formed value.
/// - `Err(reason)` for anything else; callers attach line and column.
pub fn parse_optional<T>(s: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if is_missing(s) {
        return Ok(None);
    }
    s.trim().parse::<T>().map(Some).map_err(|e| e.to_string())
}

pub fn parse_f64(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty value".to_string());
    }
    s.parse::<f64>().map_err(|e| e.to_string())
}

pub fn parse_date_dmy(s: &str) -> Result<NaiveDate, String> {
    // Order dates are expected in `DD-MM-YYYY` format.
    NaiveDate::parse_from_str(s.trim(), "%d-%m-%Y").map_err(|e| e.to_string())
}

/// Extract the minutes from text like `"(min) 24"`.
pub fn parse_minutes(s: &str) -> Result<u32, String> {
    let Some((_, rest)) = s.split_once(MINUTES_MARKER) else {
        return Err(format!("missing {:?} marker", MINUTES_MARKER.trim_end()));
    };
    rest.trim().parse::<u32>().map_err(|e| e.to_string())
}

/// Great-circle distance in kilometres between two `(lat, lon)` points in
/// degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    // `Point` is (x = lon, y = lat).
    let origin = Point::new(from.1, from.0);
    let destination = Point::new(to.1, to.0);
    Haversine::distance(origin, destination) / 1000.0
}

/// Week of the year with Sunday as the first day of the week, the same
/// numbering as `strftime("%U")`. Days before the first Sunday are week 0.
pub fn week_of_year_sunday(date: NaiveDate) -> u32 {
    (date.ordinal0() + 7 - date.weekday().num_days_from_sunday()) / 7
}

pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Undefined for fewer than
/// two values.
pub fn sample_std(v: &[f64]) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let mean = average(v)?;
    let ss: f64 = v.iter().map(|x| (x - mean).powi(2)).sum();
    Some((ss / (v.len() - 1) as f64).sqrt())
}

pub fn median(mut v: Vec<f64>) -> Option<f64> {
    // We accept `Vec<f64>` by value so the function can sort in-place
    // without cloning at the call site.
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

pub fn round_to(n: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (n * factor).round() / factor
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

pub fn format_opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

// `tabled` display hooks for numeric report columns.

pub fn display_f64(v: &f64) -> String {
    format_number(*v, 3)
}

pub fn display_opt_f64(v: &Option<f64>) -> String {
    match v {
        Some(v) => format_number(*v, 3),
        None => "-".to_string(),
    }
}
