use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use rouilleftp::core_cli::Cli;
use rouilleftp::{server, Config};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Determine the default config path based on the OS
    let default_config_path = if cfg!(target_os = "windows") {
        "C:\\rouilleftpd\\etc\\rouilleftpd.conf"
    } else {
        "/etc/rouilleftpd.conf"
    };

    // Without a config file, --root alone is enough to serve a directory
    let mut config = match (&args.config, &args.root) {
        (Some(path), _) => Config::load_from_file(path)?,
        (None, Some(_)) => Config::default(),
        (None, None) => Config::load_from_file(default_config_path)?,
    };

    if let Some(root) = args.root {
        config.server.chroot_dir = root;
    }
    if let Some(listen) = &args.listen {
        config
            .set_listen_addr(listen)
            .with_context(|| format!("Invalid --listen value: {}", listen))?;
    }

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}
