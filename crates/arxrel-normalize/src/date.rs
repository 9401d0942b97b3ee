//! First-submission date from the revision history

use chrono::{DateTime, NaiveDate};

use crate::error::DateError;
use crate::record::Version;

/// Calendar date of the first revision (index 0).
///
/// The date is taken as written in the timestamp; no timezone conversion.
pub fn first_submission_date(versions: &[Version]) -> Result<NaiveDate, DateError> {
    let first = versions.first().ok_or(DateError::EmptyHistory)?;
    parse_timestamp(&first.created).ok_or_else(|| DateError::Parse {
        raw: first.created.clone(),
    })
}

/// Parse an RFC 2822-like timestamp into its date component.
///
/// Strict RFC 2822 first, then a lenient scan that accepts full or
/// abbreviated month and weekday names, optional weekday, time and zone,
/// and either day-month or month-day order.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    parse_lenient(s)
}

fn parse_lenient(s: &str) -> Option<NaiveDate> {
    let mut day: Option<u32> = None;
    let mut month: Option<u32> = None;
    let mut year: Option<i32> = None;

    for tok in s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        // times ("19:18:42") and numeric zones ("+0000")
        if tok.contains(':') || tok.starts_with('+') || tok.starts_with('-') {
            continue;
        }
        if tok.bytes().all(|b| b.is_ascii_digit()) {
            match tok.len() {
                1 | 2 if day.is_none() => day = tok.parse().ok(),
                4 if year.is_none() => year = tok.parse().ok(),
                _ => return None,
            }
            continue;
        }
        if let Some(m) = month_number(tok) {
            if month.replace(m).is_some() {
                return None;
            }
        }
        // Anything else is a weekday or a zone name
    }

    NaiveDate::from_ymd_opt(year?, month?, day?)
}

/// Month number from a full or abbreviated English name, any case.
fn month_number(s: &str) -> Option<u32> {
    let lower = s.trim_end_matches('.').to_ascii_lowercase();
    let m = match lower.as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(created: &str) -> Version {
        Version {
            version: "v1".into(),
            created: created.into(),
            size: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn snapshot_format() {
        assert_eq!(
            parse_timestamp("Mon, 2 Apr 2007 19:18:42 GMT"),
            Some(ymd(2007, 4, 2))
        );
        assert_eq!(
            parse_timestamp("Sat, 31 Mar 2007 02:26:18 GMT"),
            Some(ymd(2007, 3, 31))
        );
    }

    #[test]
    fn date_is_not_shifted_by_zone() {
        assert_eq!(
            parse_timestamp("Tue, 3 Apr 2007 23:30:00 -0500"),
            Some(ymd(2007, 4, 3))
        );
    }

    #[test]
    fn full_names_and_missing_weekday() {
        assert_eq!(
            parse_timestamp("Monday, 2 April 2007 19:18:42 GMT"),
            Some(ymd(2007, 4, 2))
        );
        assert_eq!(parse_timestamp("2 Apr 2007"), Some(ymd(2007, 4, 2)));
        assert_eq!(parse_timestamp("Sept 9 2010"), Some(ymd(2010, 9, 9)));
        assert_eq!(parse_timestamp("thu, 01 JAN 2015"), Some(ymd(2015, 1, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("31 Feb 2007"), None);
        assert_eq!(parse_timestamp("2 Apr May 2007"), None);
        assert_eq!(parse_timestamp("2007-04-02"), None);
    }

    #[test]
    fn first_entry_wins() {
        let history = vec![
            v("Mon, 2 Apr 2007 19:18:42 GMT"),
            v("Tue, 10 Jul 2007 10:00:00 GMT"),
        ];
        assert_eq!(first_submission_date(&history), Ok(ymd(2007, 4, 2)));
    }

    #[test]
    fn empty_history() {
        assert_eq!(first_submission_date(&[]), Err(DateError::EmptyHistory));
    }

    #[test]
    fn bad_first_entry_is_not_rescued_by_later_ones() {
        let history = vec![v("soon"), v("Mon, 2 Apr 2007 19:18:42 GMT")];
        assert_eq!(
            first_submission_date(&history),
            Err(DateError::Parse { raw: "soon".into() })
        );
    }
}
