use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "schooldesk",
    version,
    about = "Terminal administrative console for school management",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend base URL.
    #[arg(long, env = "SCHOOLDESK_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Path prefix placed before every endpoint.
    #[arg(long, env = "SCHOOLDESK_API_PREFIX", value_name = "PREFIX")]
    pub api_prefix: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Dashboard refresh interval in seconds (0 disables).
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Notification duration in seconds.
    #[arg(long)]
    pub notification_duration: Option<u64>,

    /// Pre-tick "remember me" on the login screen.
    #[arg(long)]
    pub remember_me: bool,
}
