//! Subcommands and their execution against the async service.

use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

use cloudprint::{CloudPrintService, PrinterRoster};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List printers visible to the service account
    Search {
        /// Show only the printer with this id or name
        #[arg(long)]
        printer: Option<String>,
    },
    /// Submit a print job from a URL or a local file
    Submit {
        #[command(flatten)]
        target: PrinterTarget,
        /// Job title (defaults to the URL or file name)
        #[arg(long)]
        title: Option<String>,
        /// URL the service fetches the document from
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,
        /// Local document, sent inline as a data URL
        #[arg(long)]
        file: Option<PathBuf>,
        /// MIME type of --file
        #[arg(long, default_value = "application/pdf")]
        mime: String,
    },
    /// Let another account submit jobs to a printer
    Share {
        #[command(flatten)]
        target: PrinterTarget,
        #[arg(long)]
        email: String,
        /// Send the invitation e-mail
        #[arg(long)]
        notify: bool,
    },
    /// Revoke an account's access to a printer
    Unshare {
        #[command(flatten)]
        target: PrinterTarget,
        #[arg(long)]
        email: String,
    },
    /// Accept a pending printer share invitation
    AcceptInvite {
        #[command(flatten)]
        target: PrinterTarget,
    },
}

#[derive(clap::Args, Debug)]
pub struct PrinterTarget {
    /// Printer id
    #[arg(long)]
    pub printer: String,
    /// Treat --printer as a name and resolve it with a search first
    #[arg(long)]
    pub by_name: bool,
}

/// Run `command` and return the response payload as JSON.
pub async fn run(service: &CloudPrintService, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::Search { printer } => {
            let found = service.search().await;
            match printer {
                None => Ok(serde_json::to_value(found.into_result()?)?),
                Some(wanted) => {
                    let mut roster = PrinterRoster::new();
                    roster.update(&found);
                    found.into_result()?;
                    let printer = roster
                        .by_id(&wanted)
                        .or_else(|| roster.by_name(&wanted))
                        .with_context(|| format!("no printer with id or name '{}'", wanted))?;
                    Ok(serde_json::to_value(printer)?)
                }
            }
        }
        Command::Submit {
            target,
            title,
            url,
            file,
            mime,
        } => {
            let printer_id = resolve_printer(service, &target).await?;
            let job = match (url, file) {
                (Some(url), _) => {
                    let title = title.unwrap_or_else(|| url.clone());
                    service.print_url(&printer_id, &title, &url).await
                }
                (None, Some(path)) => {
                    let document = std::fs::read(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let title = title.unwrap_or_else(|| default_title(&path));
                    service
                        .print_document(&printer_id, &title, &document, &mime)
                        .await
                }
                (None, None) => anyhow::bail!("either --url or --file is required"),
            };
            Ok(serde_json::to_value(job.into_result()?)?)
        }
        Command::Share {
            target,
            email,
            notify,
        } => {
            let printer_id = resolve_printer(service, &target).await?;
            let shared = service.share(&printer_id, &email, !notify).await;
            Ok(serde_json::to_value(shared.into_result()?)?)
        }
        Command::Unshare { target, email } => {
            let printer_id = resolve_printer(service, &target).await?;
            let unshared = service.unshare(&printer_id, &email).await;
            Ok(serde_json::to_value(unshared.into_result()?)?)
        }
        Command::AcceptInvite { target } => {
            let printer_id = resolve_printer(service, &target).await?;
            let accepted = service.process_invite(&printer_id).await;
            Ok(serde_json::to_value(accepted.into_result()?)?)
        }
    }
}

async fn resolve_printer(service: &CloudPrintService, target: &PrinterTarget) -> anyhow::Result<String> {
    if !target.by_name {
        return Ok(target.printer.clone());
    }

    let mut roster = PrinterRoster::new();
    let found = service.search().await;
    roster.update(&found);
    found.into_result()?;

    let printer = roster
        .by_name(&target.printer)
        .with_context(|| format!("no printer named '{}'", target.printer))?;
    info!("Resolved printer '{}' to {}", target.printer, printer.id);
    Ok(printer.id.clone())
}

fn default_title(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
