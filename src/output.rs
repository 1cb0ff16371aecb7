//! Where issued credentials end up: credential files the standard clients
//! read, or stdout between `BEGIN`/`END` markers.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, error};

/// How an existing file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole file.
    Overwrite,
    /// Add after the existing content.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFile {
    pub path: PathBuf,
    pub mode: WriteMode,
    pub content: String,
}

impl CredentialFile {
    /// `~/.aws/credentials`, replaced entirely or extended with a new profile.
    #[must_use]
    pub fn aws(home: &Path, content: String, append: bool) -> Self {
        Self {
            path: home.join(".aws").join("credentials"),
            mode: if append {
                WriteMode::Append
            } else {
                WriteMode::Overwrite
            },
            content,
        }
    }

    /// `~/.pgpass`; libpq picks the matching line, so new users are appended.
    #[must_use]
    pub fn pgpass(home: &Path, line: String) -> Self {
        Self {
            path: home.join(".pgpass"),
            mode: WriteMode::Append,
            content: line,
        }
    }

    /// `~/.my.cnf`; holds a single `[client]` block, so it is truncated.
    #[must_use]
    pub fn my_cnf(home: &Path, block: String) -> Self {
        Self {
            path: home.join(".my.cnf"),
            mode: WriteMode::Overwrite,
            content: block,
        }
    }

    /// Write the content (newline terminated) with owner-only permissions,
    /// creating the parent directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created or written.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            create_private_dir(parent)
                .with_context(|| format!("Unable to create {}", parent.display()))?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        match self.mode {
            WriteMode::Overwrite => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Unable to open {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Unable to secure {}", self.path.display()))?;
        }

        writeln!(file, "{}", self.content.trim_end_matches('\n'))
            .with_context(|| format!("Unable to write creds to {}", self.path.display()))?;

        debug!("wrote {:?} to {}", self.mode, self.path.display());

        Ok(())
    }

    /// [`write`](Self::write), printing the would-be content to stderr on
    /// failure so the credentials are not lost.
    ///
    /// # Errors
    /// Returns the write error after dumping the content.
    pub fn write_or_dump(&self) -> Result<()> {
        self.write().inspect_err(|e| {
            error!("{:#}", e);
            eprintln!("Unable to write to {}, credential info follows:", self.path.display());
            eprintln!("{}", self.content);
        })
    }
}

fn create_private_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

/// Wrap `body` in the markers used for stdout output.
#[must_use]
pub fn framed(kind: &str, body: &str) -> String {
    format!(
        "----- BEGIN {kind} CREDS -----\n{}\n----- END {kind} CREDS -----",
        body.trim_end_matches('\n')
    )
}

/// An `~/.aws/credentials` profile block.
#[must_use]
pub fn aws_profile(
    profile: &str,
    access_key: &str,
    secret_key: &str,
    session_token: Option<&str>,
) -> String {
    let mut block = format!(
        "[{profile}]\naws_access_key_id = {access_key}\naws_secret_access_key = {secret_key}\n"
    );
    if let Some(token) = session_token {
        block.push_str(&format!("aws_session_token = {token}\n"));
    }
    block
}

/// A `.pgpass` line: `host:port:database:username:password`.
#[must_use]
pub fn pgpass_line(host: &str, port: u16, database: &str, username: &str, password: &str) -> String {
    format!("{host}:{port}:{database}:{username}:{password}")
}

/// A `.my.cnf` client block.
#[must_use]
pub fn my_cnf(username: &str, password: &str) -> String {
    format!("[client]\nuser={username}\npassword={password}")
}

/// Render a lease duration as hours, minutes and seconds, e.g. `1h0m0s`.
#[must_use]
pub fn human_duration(seconds: u64) -> String {
    let (hours, minutes, seconds) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
