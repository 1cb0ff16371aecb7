use crate::{
    cli::{actions::file_target, globals::GlobalArgs},
    credentials::{AwsCredentials, AwsRequest, Orchestrator},
    output::{self, CredentialFile},
    prompt::TerminalPrompt,
};
use anyhow::Result;
use std::io::{self, Write};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub request: AwsRequest,
    pub profile: String,
    pub stdout: bool,
    pub append: bool,
}

/// Request AWS credentials and put them where the AWS CLI looks for them.
///
/// # Errors
/// Returns an error if the credentials cannot be issued or written.
pub async fn execute(args: Args) -> Result<()> {
    let prompt = TerminalPrompt;
    let credentials = Orchestrator::new(&args.globals, &prompt)
        .aws(&args.request)
        .await?;

    present(&args, &credentials, &mut io::stdout().lock())
}

/// # Errors
/// Returns an error if the credentials file cannot be written.
pub fn present<W: Write>(args: &Args, credentials: &AwsCredentials, out: &mut W) -> Result<()> {
    let block = credentials.profile_block(&args.profile);

    if let Some(home) = file_target(args.stdout, args.globals.home.as_deref()) {
        let file = CredentialFile::aws(home, block, args.append);
        file.write_or_dump()?;
        writeln!(out, "Wrote AWS credentials to {}.", file.path.display())?;
    } else {
        writeln!(out, "Save these credentials to ~/.aws/credentials")?;
        writeln!(out, "{}", output::framed("AWS", &block))?;
    }

    writeln!(
        out,
        "Credential Lease Duration: {}.",
        output::human_duration(credentials.bundle.lease_duration)
    )?;

    if credentials.iam {
        writeln!(out, "FYI: IAM credentials take ~15 seconds to become active.")?;
    }

    Ok(())
}
