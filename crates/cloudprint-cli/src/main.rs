mod commands;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cloudprint::{CloudPrintError, CloudPrintService, ServiceConfig};
use commands::Command;

/// Proxy identifier used when no config file supplies one
const DEFAULT_SOURCE: &str = "cloudprint-cli";

#[derive(Parser, Debug)]
#[command(name = "cloudprint-cli", version, about = "Manage Cloud Print printers and jobs")]
struct Args {
    /// Config file (default: ~/.cloudprint/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service-account JSON key file
    #[arg(long, global = true, conflicts_with = "p12")]
    json_key: Option<PathBuf>,

    /// Service-account PKCS#12 certificate
    #[arg(long, global = true, requires = "email")]
    p12: Option<PathBuf>,

    /// Service-account email for --p12
    #[arg(long, global = true)]
    email: Option<String>,

    /// Passphrase for --p12
    #[arg(long, global = true, default_value = "notasecret")]
    passphrase: String,

    /// Value of the X-CloudPrint-Proxy header
    #[arg(long, global = true)]
    source: Option<String>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Flags take precedence over the config file.
    fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        let source = self.source.clone().unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        if let Some(key) = &self.json_key {
            return Ok(ServiceConfig::with_json_key(source, key));
        }
        if let (Some(p12), Some(email)) = (&self.p12, &self.email) {
            return Ok(ServiceConfig::with_certificate(source, email, p12, &self.passphrase));
        }

        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)?,
            None => ServiceConfig::load_default()?,
        };
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.service_config()?;
    debug!("Using service config {:?}", config);

    let service = CloudPrintService::from_config(&config)?;
    let output = commands::run(&service, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Exit status for a failed run: the error kind's code for service errors,
/// 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CloudPrintError>() {
        Some(e) => e.kind().code() as u8,
        None => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CloudPrintError>() {
                Some(e) => eprintln!("error: {}", e.message()),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::from(exit_status(&err))
        }
    }
}
