use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Address passive listeners bind to and advertise. Defaults to the
    /// local address of each control connection.
    #[serde(default)]
    pub pasv_address: Option<String>,
    /// Directory served as `/`.
    pub chroot_dir: String,
    #[serde(default)]
    pub upload_buffer_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
}

fn default_listen_address() -> String {
    String::from("0.0.0.0")
}

fn default_listen_port() -> u16 {
    21
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            pasv_address: None,
            chroot_dir: String::from("/var/ftp"),
            upload_buffer_size: Some(DEFAULT_UPLOAD_BUFFER_SIZE),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // Set defaults if not specified
        if config.server.upload_buffer_size.is_none() {
            config.server.upload_buffer_size = Some(DEFAULT_UPLOAD_BUFFER_SIZE);
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        if self.server.listen_address.contains(':') {
            format!("[{}]:{}", self.server.listen_address, self.server.listen_port)
        } else {
            format!("{}:{}", self.server.listen_address, self.server.listen_port)
        }
    }

    /// Applies a `host:port` override. IPv6 hosts may be bracketed.
    pub fn set_listen_addr(&mut self, listen: &str) -> Result<()> {
        let (host, port) = listen
            .rsplit_once(':')
            .context("expected host:port")?;
        self.server.listen_port = port
            .parse()
            .with_context(|| format!("invalid port: {}", port))?;
        self.server.listen_address = host.trim_start_matches('[').trim_end_matches(']').to_string();
        Ok(())
    }

    pub fn upload_buffer_size(&self) -> usize {
        self.server
            .upload_buffer_size
            .unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_toml("[server]\nchroot_dir = \"/srv/ftp\"\n").unwrap();
        assert_eq!(config.server.listen_address, "0.0.0.0");
        assert_eq!(config.server.listen_port, 21);
        assert_eq!(config.server.pasv_address, None);
        assert_eq!(config.upload_buffer_size(), DEFAULT_UPLOAD_BUFFER_SIZE);
        assert_eq!(config.listen_addr(), "0.0.0.0:21");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [server]
            listen_address = "127.0.0.1"
            listen_port = 2121
            pasv_address = "10.0.0.5"
            chroot_dir = "/data"
            upload_buffer_size = 4096
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:2121");
        assert_eq!(config.server.pasv_address.as_deref(), Some("10.0.0.5"));
        assert_eq!(config.upload_buffer_size(), 4096);
    }

    #[test]
    fn test_listen_override() {
        let mut config = Config::default();
        config.set_listen_addr("127.0.0.1:2121").unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:2121");

        config.set_listen_addr("[::1]:21").unwrap();
        assert_eq!(config.server.listen_address, "::1");
        assert_eq!(config.listen_addr(), "[::1]:21");

        assert!(config.set_listen_addr("localhost").is_err());
        assert!(config.set_listen_addr("localhost:ftp").is_err());
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(Config::from_toml("[server]\nlisten_port = 21\n").is_err());
    }
}
