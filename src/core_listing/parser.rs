use super::error::ListingError;
use super::types::{Entry, EntryType};
use chrono::{DateTime, Datelike, Utc};
use log::debug;

/// Layout the reconstructed `day month year time zone` stamp is parsed with.
const DATE_LAYOUT: &str = "%d %b %Y %H:%M %z";

/// Parses one Unix-style `ls -l` line as sent in reply to LIST:
///
/// ```text
/// -rw-r--r--   1 owner group     2134 Jan  1 12:00 file name.txt
/// drwxr-xr-x   2 owner group     4096 Mar 14  2019 archive
/// ```
///
/// A time of day in the eighth column means the current year. Names may
/// contain spaces; everything from the ninth column onward is the name.
pub fn parse_list_line(line: &str) -> Result<Entry, ListingError> {
    parse_list_line_in_year(line, Utc::now().year())
}

/// Parses a whole LIST body, skipping every line that does not parse.
pub fn parse_listing(body: &str) -> Vec<Entry> {
    body.lines()
        .filter_map(|line| match parse_list_line(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping LIST line {:?}: {}", line, e);
                None
            }
        })
        .collect()
}

pub(crate) fn parse_list_line_in_year(
    line: &str,
    current_year: i32,
) -> Result<Entry, ListingError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 9 {
        return Err(ListingError::TooFewFields(fields.len()));
    }

    let entry_type = match fields[0].chars().next() {
        Some('-') => EntryType::File,
        Some('d') => EntryType::Directory,
        Some('l') => EntryType::Link,
        other => return Err(ListingError::UnknownType(other.unwrap_or_default())),
    };

    let size = if entry_type == EntryType::File {
        fields[4]
            .parse::<u64>()
            .map_err(|_| ListingError::InvalidSize(fields[4].to_string()))?
    } else {
        0
    };

    let time = parse_time(fields[5], fields[6], fields[7], current_year)?;

    Ok(Entry {
        name: fields[8..].join(" "),
        entry_type,
        size,
        time,
    })
}

fn parse_time(
    month: &str,
    day: &str,
    year_or_clock: &str,
    current_year: i32,
) -> Result<DateTime<Utc>, ListingError> {
    let invalid = || ListingError::InvalidDate(format!("{} {} {}", month, day, year_or_clock));

    let (year, clock) = if year_or_clock.contains(':') {
        (current_year, year_or_clock)
    } else {
        (expand_year(year_or_clock).ok_or_else(invalid)?, "00:00")
    };

    let stamp = format!("{} {} {} {} +0000", day, month, year, clock);
    DateTime::parse_from_str(&stamp, DATE_LAYOUT)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| invalid())
}

/// Four-digit years are taken as-is; two-digit years pivot at 69.
fn expand_year(year: &str) -> Option<i32> {
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = year.parse().ok()?;
    match year.len() {
        4 => Some(value),
        2 if value >= 69 => Some(1900 + value),
        2 => Some(2000 + value),
        _ => None,
    }
}
