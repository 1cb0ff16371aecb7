use crate::{
    credentials::{AwsMaterial, CredentialBundle, Login, Orchestrator, secret_field},
    output,
    prompt::Prompt,
};
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tracing::{info, instrument};

pub const DEFAULT_ENGINE: &str = "aws";

#[derive(Debug, Clone)]
pub struct AwsRequest {
    pub login: Login,
    pub role: String,
    pub engine: String,
    /// Long-lived IAM user keys instead of STS session credentials.
    pub iam: bool,
    pub ttl: Option<u64>,
}

impl AwsRequest {
    /// Mount of the secrets engine; anything but the default lives at
    /// `aws-<name>`.
    #[must_use]
    pub fn mount(&self) -> String {
        if self.engine == DEFAULT_ENGINE {
            DEFAULT_ENGINE.to_string()
        } else {
            format!("{DEFAULT_ENGINE}-{}", self.engine)
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        let kind = if self.iam { "creds" } else { "sts" };
        format!("{}/{kind}/{}", self.mount(), self.role)
    }
}

#[derive(Debug)]
pub struct AwsCredentials {
    pub bundle: CredentialBundle<AwsMaterial>,
    pub iam: bool,
}

impl AwsCredentials {
    /// The `~/.aws/credentials` block under `profile`.
    #[must_use]
    pub fn profile_block(&self, profile: &str) -> String {
        let material = &self.bundle.material;

        output::aws_profile(
            profile,
            &material.access_key,
            material.secret_key.expose_secret(),
            material
                .session_token
                .as_ref()
                .map(|token| token.expose_secret()),
        )
    }
}

impl<P: Prompt> Orchestrator<'_, P> {
    /// Log in and read AWS credentials for `request.role`.
    ///
    /// # Errors
    /// Returns an error if authentication or the secret read fails, or the
    /// secret lacks its keys.
    #[instrument(skip(self))]
    pub async fn aws(&self, request: &AwsRequest) -> Result<AwsCredentials> {
        let session = self.session(&request.login).await?;

        let query: Vec<(&str, String)> = request
            .ttl
            .map(|ttl| ("ttl", format!("{ttl}s")))
            .into_iter()
            .collect();

        let path = request.path();
        let secret = session
            .read(&path, &query)
            .await
            .context("Error reading secret")?;

        let material = AwsMaterial {
            access_key: secret.require_str("access_key")?.to_string(),
            secret_key: secret_field(&secret, "secret_key")?,
            session_token: if request.iam {
                None
            } else {
                Some(secret_field(&secret, "security_token")?)
            },
        };

        info!("issued AWS credentials from {}", path);

        Ok(AwsCredentials {
            bundle: CredentialBundle::from_secret(&secret, material),
            iam: request.iam,
        })
    }
}
