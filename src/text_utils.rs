use std::ops::Index;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses a BlogML timestamp such as `2012-02-19T08:30:00`, `2012-02-19T15:30:00Z`
/// or `2012-02-19T08:30:00.123-07:00`.
///
/// The offset is `None` when the value has no designator (an "unspecified" time).
pub fn parse_date_time(buf: &str) -> Result<(NaiveDateTime, Option<FixedOffset>), String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(?:\.\d+)?(Z|[+-]\d{2}:?\d{2})?$"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    // We are using the regex approach to make it more flexible
    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = match caps.get(6) {
        Some(s) => to_u32(s.as_str())?,
        None => 0,
    };

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid date in {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Invalid time in {}", buf))?;

    let offset = match caps.get(7).map(|m| m.as_str()) {
        None => None,
        Some("Z") => FixedOffset::east_opt(0),
        Some(designator) => Some(parse_offset(designator)?),
    };

    Ok((NaiveDateTime::new(date, time), offset))
}

/// Parses `+hh:mm`, `-hh:mm` or `+hhmm`.
pub fn parse_offset(buf: &str) -> Result<FixedOffset, String> {
    let buf = buf.trim();
    let (sign, digits) = match buf.chars().next() {
        Some('+') => (1, &buf[1..]),
        Some('-') => (-1, &buf[1..]),
        _ => return Err(format!("Offset must start with + or -: {}", buf)),
    };

    let digits: String = digits.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return Err(format!("Unable to parse offset {}", buf));
    }

    let hours: i32 = to_int(&digits[0..2], buf)?;
    let minutes: i32 = to_int(&digits[2..4], buf)?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("Offset out of range: {}", buf))
}

/// Formats a date the way Hugo front matter expects it, e.g. `2020-01-02T10:00:00-07:00`.
pub fn format_date_time(date_time: &DateTime<FixedOffset>) -> String {
    date_time.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Replaces line breaks and tabs with spaces and collapses runs of spaces.
pub fn normalize_whitespace(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut prev_space = false;

    for c in text.chars() {
        let c = match c {
            '\r' | '\n' | '\t' => ' ',
            c => c,
        };

        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        res.push(c);
    }

    res
}

/// Escapes a value for a double-quoted front matter string (title).
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Escapes a value for a double-quoted front matter string that may contain
/// backslashes (excerpt).
pub fn escape_quoted_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_parse_date_time() {
        let (date_time, offset) = parse_date_time("2012-02-19T08:30:15").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2012-02-19 08:30:15");
        assert!(offset.is_none());

        let (date_time, offset) = parse_date_time("2012-02-19T08:30:15.123Z").unwrap();
        assert_eq!(date_time.second(), 15);
        assert_eq!(offset, FixedOffset::east_opt(0));

        let (_, offset) = parse_date_time("2012-02-19T08:30:15-07:00").unwrap();
        assert_eq!(offset, FixedOffset::west_opt(7 * 3600));

        let (date_time, _) = parse_date_time("2017-09-10 10:42").unwrap();
        assert_eq!(date_time.format("%H:%M:%S").to_string(), "10:42:00");
    }

    #[test]
    fn test_parse_date_time_errors() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2012-02-30T08:30:15").is_err());
        assert!(parse_date_time("2012-02-19T25:30:15").is_err());
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+02:00"), Ok(FixedOffset::east_opt(7200).unwrap()));
        assert_eq!(parse_offset("-0730"), Ok(FixedOffset::west_opt(27000).unwrap()));
        assert!(parse_offset("02:00").is_err());
        assert!(parse_offset("+2:00").is_err());
    }

    #[test]
    fn test_format_date_time() {
        let offset = FixedOffset::west_opt(7 * 3600).unwrap();
        let date_time = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()
            .and_hms_opt(10, 0, 0).unwrap()
            .and_local_timezone(offset).unwrap();
        assert_eq!(format_date_time(&date_time), "2020-01-02T10:00:00-07:00");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("Some     cool\r\n\t  content "), "Some cool content ");
        assert_eq!(normalize_whitespace("\n\nx"), " x");
        assert_eq!(normalize_whitespace("plain"), "plain");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_quotes(r#"The "best" post"#), r#"The \"best\" post"#);
        assert_eq!(escape_quoted_string(r#"C:\temp "x""#), r#"C:\\temp \"x\""#);
    }
}
