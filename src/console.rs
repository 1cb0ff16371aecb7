use std::{fmt, io, process::Command};
use tracing::{debug, instrument};

/// A database client invocation for a resolved endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ConsoleCommand {
    /// `psql` against a verified TLS connection; the password comes from `.pgpass`.
    #[must_use]
    pub fn psql(host: &str, port: u16, database: &str, username: &str) -> Self {
        Self {
            program: "psql".to_string(),
            args: vec![format!(
                "postgres://{username}@{host}:{port}/{database}?sslmode=verify-full"
            )],
        }
    }

    /// `mysql`; user and password come from `.my.cnf`.
    #[must_use]
    pub fn mysql(host: &str) -> Self {
        Self {
            program: "mysql".to_string(),
            args: vec!["-h".to_string(), host.to_string()],
        }
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs a console with the terminal handed over to it.
pub trait Launcher {
    /// Run `command` to completion, returning its exit code (`None` when
    /// killed by a signal).
    ///
    /// # Errors
    /// Returns an error if the program cannot be started.
    fn launch(&self, command: &ConsoleCommand) -> io::Result<Option<i32>>;
}

/// Spawns the real program with inherited stdin, stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    #[instrument(skip(self))]
    fn launch(&self, command: &ConsoleCommand) -> io::Result<Option<i32>> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()?;

        debug!("{} exited with {}", command.program, status);

        Ok(status.code())
    }
}
