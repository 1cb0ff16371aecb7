use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_VAULT_ADDR: &str = "vault-addr";
pub const ARG_AUTH_MOUNT: &str = "auth-mount";

pub const DEFAULT_AUTH_MOUNT: &str = "ldap";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VAULT_ADDR)
                .long(ARG_VAULT_ADDR)
                .help("Vault address, example: https://vault.tld:8200")
                .env("VAULT_ADDR")
                .global(true),
        )
        .arg(
            Arg::new(ARG_AUTH_MOUNT)
                .long(ARG_AUTH_MOUNT)
                .help("Mount of the LDAP auth method")
                .env("LESSEE_AUTH_MOUNT")
                .default_value(DEFAULT_AUTH_MOUNT)
                .global(true),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub addr: String,
    pub auth_mount: String,
}

impl Options {
    /// # Errors
    /// Returns an error if no Vault address was given.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let addr = matches
            .get_one::<String>(ARG_VAULT_ADDR)
            .filter(|addr| !addr.is_empty())
            .cloned()
            .context("missing required argument: --vault-addr (or set VAULT_ADDR)")?;

        let auth_mount = matches
            .get_one::<String>(ARG_AUTH_MOUNT)
            .cloned()
            .unwrap_or_else(|| DEFAULT_AUTH_MOUNT.to_string());

        Ok(Self { addr, auth_mount })
    }
}
