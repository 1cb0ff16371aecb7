use crate::{
    cli::{actions::file_target, globals::GlobalArgs},
    console::{Launcher, ProcessLauncher},
    credentials::{DatabaseCredentials, DatabaseRequest, Orchestrator},
    inventory::RdsInventory,
    output,
    prompt::TerminalPrompt,
};
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use std::io::{self, Write};
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub request: DatabaseRequest,
    pub region: String,
    pub stdout: bool,
    pub no_console: bool,
}

/// Request database credentials, store them for the native client and
/// optionally start its console.
///
/// # Errors
/// Returns an error if the credentials cannot be issued or written, or the
/// console cannot be started.
pub async fn execute(args: Args) -> Result<()> {
    let prompt = TerminalPrompt;
    let inventory = RdsInventory::new(&args.region).await;

    let credentials = Orchestrator::new(&args.globals, &prompt)
        .database(&args.request, &inventory)
        .await?;

    present(&args, &credentials, &mut io::stdout().lock(), &ProcessLauncher)
}

/// # Errors
/// Returns an error if the credential file cannot be written or the console
/// cannot be started.
pub fn present<W: Write, L: Launcher>(
    args: &Args,
    credentials: &DatabaseCredentials,
    out: &mut W,
    launcher: &L,
) -> Result<()> {
    let file = file_target(args.stdout, args.globals.home.as_deref()).and_then(|home| {
        let file = credentials.credential_file(home);
        if file.is_none() {
            warn!("Unable to determine the database endpoint. I'll write to stdout.");
        }
        file
    });

    if let Some(file) = file {
        file.write_or_dump()?;
        writeln!(out, "Wrote database credentials to {}.", file.path.display())?;
    } else {
        writeln!(out, "{}", output::framed("DB", &credentials.listing()))?;
    }

    writeln!(out, "Vault Token: {}", credentials.token.expose_secret())?;
    writeln!(out, "Lease ID: {}", credentials.bundle.lease_id)?;
    writeln!(
        out,
        "Credential Lease Duration: {}.",
        output::human_duration(credentials.bundle.lease_duration)
    )?;

    let Some(command) = credentials.console() else {
        return Ok(());
    };

    writeln!(out, "Command:\n{command}\n")?;

    if args.no_console {
        return Ok(());
    }
    out.flush()?;

    let code = launcher
        .launch(&command)
        .with_context(|| format!("Unable to start {}", command.program))?;

    if code != Some(0) {
        warn!("{} exited with {:?}", command.program, code);
    }

    Ok(())
}
