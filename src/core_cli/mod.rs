use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "rouilleftpd", about = "A FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, as host:port (overrides the configuration)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Directory served as `/` (overrides the configuration)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
