use crate::core_ftpcommand::utils::normalize_path;
use crate::core_log::SessionLogger;
use crate::core_network::data_conn::DataConn;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// State of one accepted control connection.
///
/// `rename_from`, `data_conn` and `restart_offset` are single-slot, transient
/// values: each is consumed by the command that follows the one that set it.
pub struct Session {
    /// Working directory as the client sees it, always `/`-rooted.
    pub current_dir: String,
    /// Directory that `/` maps to on disk.
    pub base_path: PathBuf,
    pub rename_from: Option<PathBuf>,
    pub data_conn: Option<Box<dyn DataConn>>,
    pub restart_offset: Option<u64>,
    /// Address passive listeners bind to and advertise.
    pub host: String,
    pub logger: SessionLogger,
}

/// A command argument resolved against the session's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Path as the client sees it (`/docs/a.txt`).
    pub virtual_path: String,
    /// Path on disk under the session root.
    pub real_path: PathBuf,
}

impl Session {
    pub fn new(base_path: PathBuf, host: impl Into<String>, logger: SessionLogger) -> Self {
        Self {
            current_dir: String::from("/"),
            base_path,
            rename_from: None,
            data_conn: None,
            restart_offset: None,
            host: host.into(),
            logger,
        }
    }

    /// Resolves a command argument: a leading `/` starts at the root,
    /// anything else starts at the working directory.
    pub fn resolve(&self, arg: &str) -> ResolvedPath {
        let virtual_path = normalize_path(&self.current_dir, arg);
        let real_path = virtual_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.base_path.clone(), |path, part| path.join(part));

        ResolvedPath {
            virtual_path,
            real_path,
        }
    }

    /// Installs a new data connection, closing any previous one.
    pub async fn replace_data_conn(&mut self, conn: Box<dyn DataConn>) {
        self.close_data_conn().await;
        self.data_conn = Some(conn);
    }

    pub async fn close_data_conn(&mut self) {
        if let Some(mut conn) = self.data_conn.take() {
            if let Err(e) = conn.shutdown().await {
                self.logger
                    .debug(format_args!("Error closing data connection: {}", e));
            }
            self.logger.debug("Data connection closed.");
        }
    }

    /// Back to the state right after login.
    pub async fn reset(&mut self) {
        self.current_dir = String::from("/");
        self.rename_from = None;
        self.restart_offset = None;
        self.close_data_conn().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            PathBuf::from("/srv/ftp"),
            "127.0.0.1",
            SessionLogger::new("test"),
        )
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let mut session = session();
        session.current_dir = "/docs".to_string();

        let relative = session.resolve("notes.txt");
        assert_eq!(relative.virtual_path, "/docs/notes.txt");
        assert_eq!(relative.real_path, PathBuf::from("/srv/ftp/docs/notes.txt"));

        let absolute = session.resolve("/pub/readme");
        assert_eq!(absolute.virtual_path, "/pub/readme");
        assert_eq!(absolute.real_path, PathBuf::from("/srv/ftp/pub/readme"));
    }

    #[test]
    fn test_resolve_cannot_escape_root() {
        let session = session();
        let resolved = session.resolve("../../etc/passwd");
        assert_eq!(resolved.virtual_path, "/etc/passwd");
        assert_eq!(resolved.real_path, PathBuf::from("/srv/ftp/etc/passwd"));

        let root = session.resolve("/..");
        assert_eq!(root.virtual_path, "/");
        assert_eq!(root.real_path, PathBuf::from("/srv/ftp"));
    }

    #[tokio::test]
    async fn test_reset_clears_transient_state() {
        let mut session = session();
        session.current_dir = "/a/b".to_string();
        session.rename_from = Some(PathBuf::from("/srv/ftp/x"));
        session.restart_offset = Some(10);

        session.reset().await;

        assert_eq!(session.current_dir, "/");
        assert!(session.rename_from.is_none());
        assert!(session.restart_offset.is_none());
        assert!(session.data_conn.is_none());
    }
}
