use super::types::FileItem;
use std::fmt::Write;

/// Sent instead of an empty body: real listings always carry `.` and `..`.
const EMPTY_LISTING: &[u8] = b"drwxrwxrwx 1 user group 0 Apr  1 00:00 .\r\n\
drwxrwxrwx 1 user group 0 Apr  1 00:00 ..\r\n";

/// Formats items as LIST lines:
/// `perms\t1 user\tgroup\t    size Mon dd HH:MM name\r\n`.
pub fn list_detailed(items: &[FileItem]) -> Vec<u8> {
    if items.is_empty() {
        return EMPTY_LISTING.to_vec();
    }

    let mut listing = String::new();
    for item in items {
        let _ = write!(
            listing,
            "{}\t1 user\tgroup\t{:>8} {} {}\r\n",
            item.permissions(),
            item.size,
            item.modified.format("%b %e %H:%M"),
            item.name
        );
    }
    listing.into_bytes()
}

/// Formats items as NLST lines: one name per line.
pub fn list_short(items: &[FileItem]) -> Vec<u8> {
    if items.is_empty() {
        return EMPTY_LISTING.to_vec();
    }

    let mut listing = String::new();
    for item in items {
        listing.push_str(&item.name);
        listing.push_str("\r\n");
    }
    listing.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_listing::parser::{parse_list_line, parse_listing};
    use crate::core_listing::types::EntryType;
    use chrono::{Datelike, TimeZone, Utc};

    fn item(name: &str, entry_type: EntryType, size: u64) -> FileItem {
        let year = Utc::now().year();
        FileItem {
            name: name.to_string(),
            size,
            modified: Utc.with_ymd_and_hms(year, 3, 7, 14, 5, 0).unwrap(),
            entry_type,
            mode: 0o644,
        }
    }

    #[test]
    fn test_detailed_line_layout() {
        let body = list_detailed(&[item("notes.txt", EntryType::File, 512)]);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "-rw-r--r--\t1 user\tgroup\t     512 Mar  7 14:05 notes.txt\r\n"
        );
    }

    #[test]
    fn test_detailed_round_trip() {
        let items = vec![
            item("report final.pdf", EntryType::File, 1_234_567),
            item("docs", EntryType::Directory, 4096),
            item("current", EntryType::Link, 9),
        ];
        let body = String::from_utf8(list_detailed(&items)).unwrap();

        for (line, original) in body.lines().zip(&items) {
            let entry = parse_list_line(line).unwrap();
            assert_eq!(entry.name, original.name);
            assert_eq!(entry.entry_type, original.entry_type);
            assert_eq!(entry.time, original.modified);
            if original.entry_type == EntryType::File {
                assert_eq!(entry.size, original.size);
            }
        }
    }

    #[test]
    fn test_empty_listing_has_dot_entries() {
        let detailed = list_detailed(&[]);
        let entries = parse_listing(std::str::from_utf8(&detailed).unwrap());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".", ".."]);
        assert!(entries.iter().all(|e| e.entry_type == EntryType::Directory));

        assert_eq!(list_short(&[]), detailed);
    }

    #[test]
    fn test_short_listing() {
        let body = list_short(&[
            item("a.txt", EntryType::File, 1),
            item("b dir", EntryType::Directory, 0),
        ]);
        assert_eq!(body, b"a.txt\r\nb dir\r\n");
    }
}
