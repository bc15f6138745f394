use crate::constants::status;
use crate::core_listing::FileItem;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Joins `arg` onto `current_dir` (or onto `/` when `arg` is absolute) and
/// folds `.` and `..` away. The result never climbs above `/`.
pub fn normalize_path(current_dir: &str, arg: &str) -> String {
    let start = if arg.starts_with('/') { "" } else { current_dir };

    let mut parts: Vec<&str> = Vec::new();
    for part in start.split('/').chain(arg.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    format!("/{}", parts.join("/"))
}

/// Answers 501 and returns `false` when a command that needs an argument
/// arrived without one.
pub async fn require_arg(
    writer: &ControlWriter,
    session: &Session,
    command: &str,
    arg: &str,
) -> Result<bool, std::io::Error> {
    if arg.trim().is_empty() {
        session
            .logger
            .warn(format_args!("{} command received with no arguments", command));
        send_status(writer, &session.logger, status::BAD_ARGUMENTS).await?;
        return Ok(false);
    }
    Ok(true)
}

/// Pushes `data` through the session's data connection, closes it, and
/// confirms on the control connection.
pub async fn send_data(
    writer: &ControlWriter,
    session: &mut Session,
    data: &[u8],
) -> Result<(), std::io::Error> {
    let Some(mut conn) = session.data_conn.take() else {
        session.logger.warn("No data connection for transfer.");
        return send_status(writer, &session.logger, status::TRANSFER_ABORTED).await;
    };

    let outcome = conn.write_all(data).await;
    if let Err(e) = conn.shutdown().await {
        session
            .logger
            .debug(format_args!("Error shutting down data connection: {}", e));
    }
    drop(conn);

    match outcome {
        Ok(()) => {
            session
                .logger
                .info(format_args!("Sent {} bytes on data connection.", data.len()));
            send_reply(
                writer,
                &session.logger,
                status::CLOSING_DATA_CONNECTION,
                format!("Closing data connection, sent {} bytes.", data.len()),
            )
            .await
        }
        Err(e) => {
            session
                .logger
                .error(format_args!("Failed to send on data connection: {}", e));
            send_status(writer, &session.logger, status::TRANSFER_ABORTED).await
        }
    }
}

/// Lists a directory's entries, or the single item a file path names.
pub async fn read_items(path: &Path) -> Result<Vec<FileItem>, std::io::Error> {
    let metadata = fs::symlink_metadata(path).await?;
    if !metadata.is_dir() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![FileItem::from_metadata(name, &metadata)]);
    }

    let mut items = Vec::new();
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!(
                    "Failed to get metadata for entry: {:?}, error: {:?}",
                    entry.path(),
                    e
                );
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        items.push(FileItem::from_metadata(name, &metadata));
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize_path("/", "docs"), "/docs");
        assert_eq!(normalize_path("/docs", "a/b.txt"), "/docs/a/b.txt");
        assert_eq!(normalize_path("/docs", "./a"), "/docs/a");
        assert_eq!(normalize_path("/docs/a", ".."), "/docs");
    }

    #[test]
    fn test_normalize_absolute() {
        assert_eq!(normalize_path("/docs", "/pub"), "/pub");
        assert_eq!(normalize_path("/docs", "/"), "/");
        assert_eq!(normalize_path("/docs", "//pub//x/"), "/pub/x");
    }

    #[test]
    fn test_normalize_stays_under_root() {
        assert_eq!(normalize_path("/", ".."), "/");
        assert_eq!(normalize_path("/a", "../../../b"), "/b");
    }

    #[test]
    fn test_normalize_keeps_spaces() {
        assert_eq!(normalize_path("/", "my file.txt"), "/my file.txt");
    }

    #[tokio::test]
    async fn test_read_items_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"bb").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let items = read_items(dir.path()).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
        assert_eq!(items[1].size, 2);

        let single = read_items(&dir.path().join("a.txt")).await.unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name, "a.txt");
    }
}
