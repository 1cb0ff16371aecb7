//! Turning an operator login into a credential bundle.
//!
//! [`Orchestrator`] owns the flow: authenticate once, read the secret, and
//! for databases work out which RDS endpoint the credentials belong to.

pub mod aws;
pub mod database;

pub use self::aws::{AwsCredentials, AwsRequest};
pub use self::database::{DatabaseCredentials, DatabaseRequest, FileFormat};

use crate::{
    cli::globals::GlobalArgs,
    prompt::Prompt,
    vault::{self, BrokerSession, Secret, VaultClient},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::fmt;

/// Who is asking, and the second factor they supplied.
#[derive(Clone)]
pub struct Login {
    pub username: String,
    pub passcode: String,
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field("passcode", &"***")
            .finish()
    }
}

/// Keys issued by an AWS secrets engine. IAM users carry no session token.
#[derive(Debug)]
pub struct AwsMaterial {
    pub access_key: String,
    pub secret_key: SecretString,
    pub session_token: Option<SecretString>,
}

/// A dynamic database user.
#[derive(Debug)]
pub struct DatabaseMaterial {
    pub username: String,
    pub password: SecretString,
}

/// One issued secret with its lease. Printed or written once, then dropped.
#[derive(Debug)]
pub struct CredentialBundle<M> {
    pub material: M,
    pub lease_id: String,
    pub lease_duration: u64,
}

impl<M> CredentialBundle<M> {
    fn from_secret(secret: &Secret, material: M) -> Self {
        Self {
            material,
            lease_id: secret.lease_id.clone(),
            lease_duration: secret.lease_duration,
        }
    }
}

pub(crate) fn secret_field(secret: &Secret, field: &str) -> Result<SecretString> {
    Ok(SecretString::from(secret.require_str(field)?.to_string()))
}

pub struct Orchestrator<'a, P: Prompt> {
    globals: &'a GlobalArgs,
    prompt: &'a P,
}

impl<P: Prompt> fmt::Debug for Orchestrator<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("globals", &self.globals)
            .finish_non_exhaustive()
    }
}

impl<'a, P: Prompt> Orchestrator<'a, P> {
    #[must_use]
    pub const fn new(globals: &'a GlobalArgs, prompt: &'a P) -> Self {
        Self { globals, prompt }
    }

    /// Log into Vault.
    ///
    /// # Errors
    /// Returns an error if the address is unset or authentication fails.
    pub async fn session(&self, login: &Login) -> Result<BrokerSession> {
        let client = VaultClient::new(&self.globals.vault_addr)?;

        vault::authenticate(
            &client,
            &self.globals.auth_mount,
            &login.username,
            &login.passcode,
            self.prompt,
        )
        .await
        .context("Unable to auth to Vault")
    }
}
