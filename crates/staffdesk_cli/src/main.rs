//! `staffdesk` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging, and inject one session provider
//!   into the core service.
//! - Map core errors to stderr messages and exit codes.

use clap::Parser;
use staffdesk_core::config::CONFIG_PATH_ENV;
use staffdesk_core::{
    init_from_config, AppConfig, CompanyService, ConfigError, LoggingError, ServiceError,
    SessionProvider,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process;

mod commands;

use commands::Command;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "staffdesk", version)]
#[command(about = "Staffing desk: employees, departments, projects and tasks", long_about = None)]
struct Args {
    /// TOML config file
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug)]
pub(crate) enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Service(ServiceError),
    Output(std::io::Error),
}

impl CliError {
    /// 2 when the store is unreachable, 1 otherwise.
    fn exit_code(&self) -> i32 {
        match self {
            Self::Service(err) if err.is_connectivity() => 2,
            _ => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        process::exit(err.exit_code());
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = AppConfig::load_from(args.config.as_deref())?;
    init_from_config(&config.logging)?;
    log::info!(
        "event=cli_start module=cli status=ok command={}",
        args.command.name()
    );

    let sessions = SessionProvider::new(config.database);
    let service = CompanyService::new(&sessions);
    let stdout = std::io::stdout();
    args.command.execute(&service, &mut stdout.lock())
}
