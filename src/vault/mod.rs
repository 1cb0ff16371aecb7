pub mod auth;
pub mod secret;
pub mod version;

pub use self::auth::{AuthError, BrokerSession, authenticate};
pub use self::secret::{Secret, SecretError};
pub use self::version::{BrokerVersion, ProbeError, Protocol};

use crate::APP_USER_AGENT;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{Instrument, debug, info_span, instrument};
use url::Url;

/// Query string that makes `sys/health` answer 200 on any live node, so the
/// version is readable from standbys and sealed nodes too.
const HEALTH_QUERY: [(&str, &str); 4] = [
    ("standbyok", "true"),
    ("perfstandbyok", "true"),
    ("sealedcode", "200"),
    ("uninitcode", "200"),
];

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Error parsing URL: {0}")]
    Url(String),
    #[error("error talking to Vault: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} - {status}, {message}")]
    Status {
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error(transparent)]
    Secret(#[from] SecretError),
}

fn vault_error_message(json_response: &Value) -> String {
    json_response
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default()
}

/// Build the full URL for a Vault API path, filling in the default port for
/// the scheme.
///
/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String, VaultError> {
    let url = Url::parse(url).map_err(|e| VaultError::Url(e.to_string()))?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| VaultError::Url("no host specified".to_string()))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(VaultError::Url(format!("unsupported scheme {scheme}"))),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{path}");

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}

/// Thin client over the Vault HTTP API.
#[derive(Clone)]
pub struct VaultClient {
    address: String,
    client: Client,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl VaultClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(address: &str) -> Result<Self, VaultError> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Return the raw `sys/health` body.
    ///
    /// # Errors
    /// Returns an error if Vault cannot be reached or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Value, VaultError> {
        let health_url = endpoint_url(&self.address, "/v1/sys/health")?;

        let span = info_span!(
            "vault.health",
            http.method = "GET",
            url = %health_url
        );
        let response = self
            .client
            .get(&health_url)
            .query(&HEALTH_QUERY[..])
            .send()
            .instrument(span)
            .await?;

        Ok(response.json().await?)
    }

    /// `POST` a JSON body to `path`, optionally authenticated.
    ///
    /// # Errors
    /// Returns an error if the request fails or Vault returns a non-success status.
    #[instrument(skip(self, body, token))]
    pub async fn write(
        &self,
        path: &str,
        body: &Value,
        token: Option<&SecretString>,
    ) -> Result<Value, VaultError> {
        let write_url = endpoint_url(&self.address, &format!("/v1/{path}"))?;

        let span = info_span!(
            "vault.write",
            http.method = "POST",
            url = %write_url
        );
        let mut request = self.client.post(&write_url).json(body);
        if let Some(token) = token {
            request = request.header("X-Vault-Token", token.expose_secret());
        }
        let response = request.send().instrument(span).await?;

        Self::json_or_status(write_url, response).await
    }

    /// `GET` a secret at `path`.
    ///
    /// # Errors
    /// Returns an error if the request fails, Vault returns a non-success
    /// status, or the body is not a secret envelope.
    #[instrument(skip(self, token))]
    pub async fn read(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &SecretString,
    ) -> Result<Secret, VaultError> {
        let read_url = endpoint_url(&self.address, &format!("/v1/{path}"))?;

        let span = info_span!(
            "vault.read",
            http.method = "GET",
            url = %read_url
        );
        let response = self
            .client
            .get(&read_url)
            .query(query)
            .header("X-Vault-Token", token.expose_secret())
            .send()
            .instrument(span)
            .await?;

        let json_response = Self::json_or_status(read_url, response).await?;

        Ok(Secret::from_value(json_response)?)
    }

    /// Renew a lease, returning the lease duration Vault granted.
    ///
    /// # Errors
    /// Returns an error if the Vault request fails, Vault returns a non-success status, or the response is missing expected fields.
    #[instrument(skip(self, token))]
    pub async fn renew_lease(
        &self,
        lease_id: &str,
        increment: u64,
        token: &SecretString,
    ) -> Result<u64, VaultError> {
        let payload = json!({
            "increment": increment,
            "lease_id": lease_id
        });

        let json_response = self
            .write("sys/leases/renew", &payload, Some(token))
            .await?;

        json_response
            .get("lease_duration")
            .and_then(Value::as_u64)
            .ok_or_else(|| SecretError::MissingField("lease_duration".to_string()).into())
    }

    async fn json_or_status(url: String, response: reqwest::Response) -> Result<Value, VaultError> {
        let status = response.status();

        if !status.is_success() {
            let json_response: Value = response.json().await.unwrap_or(Value::Null);

            return Err(VaultError::Status {
                url,
                status,
                message: vault_error_message(&json_response),
            });
        }

        // 204 carries no body
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        Ok(response.json().await?)
    }
}
