use chrono::{DateTime, Utc};
use std::fs::Metadata;

/// Kind of object a listing line describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
    Link,
}

impl EntryType {
    /// Leading character of the permission column.
    pub fn type_char(self) -> char {
        match self {
            EntryType::File => '-',
            EntryType::Directory => 'd',
            EntryType::Link => 'l',
        }
    }
}

/// One parsed record of a detailed directory listing.
///
/// `size` is only meaningful for [`EntryType::File`]; it is zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub entry_type: EntryType,
    pub size: u64,
    pub time: DateTime<Utc>,
}

/// Filesystem metadata for one item handed to the listing formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub entry_type: EntryType,
    /// Permission bits (`0o777` mask).
    pub mode: u32,
}

impl FileItem {
    /// Builds an item from a name and the metadata of the path it names.
    ///
    /// The metadata should come from `symlink_metadata` (or a directory
    /// entry) so that links are reported as links.
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        let entry_type = if file_type.is_symlink() {
            EntryType::Link
        } else if file_type.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        };

        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Self {
            name: name.into(),
            size: metadata.len(),
            modified,
            entry_type,
            mode: permission_bits(metadata, entry_type),
        }
    }

    /// `ls -l` style permission column, e.g. `drwxr-xr-x`.
    pub fn permissions(&self) -> String {
        let mut perms = String::with_capacity(10);
        perms.push(self.entry_type.type_char());
        for shift in [6u32, 3, 0] {
            let bits = (self.mode >> shift) & 0o7;
            perms.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            perms.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            perms.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        perms
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata, _entry_type: EntryType) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata, entry_type: EntryType) -> u32 {
    match (entry_type, metadata.permissions().readonly()) {
        (EntryType::File, true) => 0o444,
        (EntryType::File, false) => 0o644,
        (_, true) => 0o555,
        (_, false) => 0o755,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_permission_string() {
        let item = FileItem {
            name: "bin".to_string(),
            size: 0,
            modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            entry_type: EntryType::Directory,
            mode: 0o755,
        };
        assert_eq!(item.permissions(), "drwxr-xr-x");

        let item = FileItem {
            entry_type: EntryType::File,
            mode: 0o640,
            ..item
        };
        assert_eq!(item.permissions(), "-rw-r-----");
    }
}
