use crate::{
    console::ConsoleCommand,
    credentials::{CredentialBundle, DatabaseMaterial, Login, Orchestrator, secret_field},
    endpoint::{self, CandidateInstance, EndpointDescriptor, EngineFamily},
    inventory::Inventory,
    output::{self, CredentialFile},
    prompt::Prompt,
    vault::Secret,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::{info, instrument, warn};

const POSTGRES_PORT: u16 = 5432;
const MYSQL_PORT: u16 = 3306;

#[derive(Debug, Clone)]
pub struct DatabaseRequest {
    pub login: Login,
    /// Name of the database connection configured in Vault.
    pub database: String,
    pub role: String,
    pub ttl: Option<u64>,
}

impl DatabaseRequest {
    #[must_use]
    pub fn config_path(&self) -> String {
        format!("database/config/{}", self.database)
    }

    #[must_use]
    pub fn creds_path(&self) -> String {
        format!("database/creds/{}-{}", self.database, self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub instance: CandidateInstance,
    pub family: EngineFamily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Pgpass,
    MyCnf,
}

impl FileFormat {
    /// The engine name RDS reports does not separate Aurora flavours, so the
    /// port decides, with the Vault plugin as a tiebreak for custom ports.
    #[must_use]
    pub const fn select(port: u16, family: EngineFamily) -> Option<Self> {
        match (port, family) {
            (POSTGRES_PORT, _) => Some(Self::Pgpass),
            (MYSQL_PORT, _) => Some(Self::MyCnf),
            (_, EngineFamily::Postgres) => Some(Self::Pgpass),
            (_, EngineFamily::Mysql) => Some(Self::MyCnf),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct DatabaseCredentials {
    pub bundle: CredentialBundle<DatabaseMaterial>,
    pub database: String,
    /// `None` when the RDS endpoint could not be determined.
    pub endpoint: Option<ResolvedEndpoint>,
    pub token: SecretString,
}

impl DatabaseCredentials {
    fn user_password(&self) -> (&str, &str) {
        let material = &self.bundle.material;
        (material.username.as_str(), material.password.expose_secret())
    }

    #[must_use]
    pub fn file_format(&self) -> Option<FileFormat> {
        let endpoint = self.endpoint.as_ref()?;
        FileFormat::select(endpoint.instance.port, endpoint.family)
    }

    /// The file these credentials belong in, if the endpoint is known.
    #[must_use]
    pub fn credential_file(&self, home: &Path) -> Option<CredentialFile> {
        let endpoint = self.endpoint.as_ref()?;
        let (username, password) = self.user_password();

        match self.file_format()? {
            FileFormat::Pgpass => Some(CredentialFile::pgpass(
                home,
                output::pgpass_line(
                    &endpoint.instance.address,
                    endpoint.instance.port,
                    &self.database,
                    username,
                    password,
                ),
            )),
            FileFormat::MyCnf => Some(CredentialFile::my_cnf(
                home,
                output::my_cnf(username, password),
            )),
        }
    }

    #[must_use]
    pub fn console(&self) -> Option<ConsoleCommand> {
        let endpoint = self.endpoint.as_ref()?;
        let (username, _) = self.user_password();

        match self.file_format()? {
            FileFormat::Pgpass => Some(ConsoleCommand::psql(
                &endpoint.instance.address,
                endpoint.instance.port,
                &self.database,
                username,
            )),
            FileFormat::MyCnf => Some(ConsoleCommand::mysql(&endpoint.instance.address)),
        }
    }

    /// Plain listing for stdout; the host line is left out when unknown.
    #[must_use]
    pub fn listing(&self) -> String {
        let (username, password) = self.user_password();

        let mut lines = vec![format!("Database: {}", self.database)];
        if let Some(endpoint) = &self.endpoint {
            lines.push(format!(
                "Host: {}:{}",
                endpoint.instance.address, endpoint.instance.port
            ));
        }
        lines.push(format!("Username: {username}"));
        lines.push(format!("Password: {password}"));

        lines.join("\n")
    }
}

/// Work out the RDS endpoint for a Vault database connection, logging why
/// when it cannot be found.
async fn locate<I: Inventory>(config: &Secret, inventory: &I) -> Option<ResolvedEndpoint> {
    let descriptor = match (
        config.require_str("plugin_name"),
        config.require_nested_str("connection_details", "connection_url"),
    ) {
        (Ok(plugin_name), Ok(connection_url)) => {
            EndpointDescriptor::new(plugin_name, connection_url)
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Vault returned no usable connection details: {}", e);
            return None;
        }
    };

    let candidates = match inventory.list_instances().await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("I'm unable to query AWS for that RDS instance: {}", e);
            return None;
        }
    };

    match endpoint::resolve(&descriptor, &candidates) {
        Ok(instance) => Some(ResolvedEndpoint {
            instance,
            family: descriptor.engine_family,
        }),
        Err(e) => {
            warn!("Sorry, I can't find that database ({}). Vault probably has the endpoint configured incorrectly.", e);
            None
        }
    }
}

impl<P: Prompt> Orchestrator<'_, P> {
    /// Log in, find the database endpoint and read a dynamic user.
    ///
    /// Endpoint lookup problems are logged and leave `endpoint` empty rather
    /// than failing.
    ///
    /// # Errors
    /// Returns an error if authentication or a Vault read fails, or the
    /// issued secret lacks a username or password.
    #[instrument(skip(self, inventory))]
    pub async fn database<I: Inventory>(
        &self,
        request: &DatabaseRequest,
        inventory: &I,
    ) -> Result<DatabaseCredentials> {
        let session = self.session(&request.login).await?;

        let config = session
            .read(&request.config_path(), &[])
            .await
            .context("Error reading DB endpoint info")?;

        let endpoint = locate(&config, inventory).await;

        let path = request.creds_path();
        let secret = session
            .read(&path, &[])
            .await
            .context("Error reading secret")?;

        let material = DatabaseMaterial {
            username: secret.require_str("username")?.to_string(),
            password: secret_field(&secret, "password")?,
        };
        let mut bundle = CredentialBundle::from_secret(&secret, material);

        if let Some(ttl) = request.ttl {
            match session.renew_lease(&bundle.lease_id, ttl).await {
                Ok(lease_duration) => bundle.lease_duration = lease_duration,
                Err(e) => warn!("Unable to extend lease to {}s: {}", ttl, e),
            }
        }

        info!("issued database credentials from {}", path);

        Ok(DatabaseCredentials {
            bundle,
            database: request.database.clone(),
            endpoint,
            token: session.token().clone(),
        })
    }
}
