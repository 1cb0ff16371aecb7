use crate::vault::VaultClient;
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("unable to reach Vault: {0}")]
    Unreachable(String),
    #[error("Vault reported a malformed version: {0:?}")]
    MalformedVersion(String),
}

/// Login flavour spoken by a Vault release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Passcode travels inside the login request.
    Legacy,
    /// Login answers with an MFA requirement, satisfied via `sys/mfa/validate`.
    Modern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl BrokerVersion {
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        if self.major <= 1 && self.minor < 11 {
            Protocol::Legacy
        } else {
            Protocol::Modern
        }
    }
}

impl fmt::Display for BrokerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for BrokerVersion {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProbeError::MalformedVersion(s.to_string());

        // 1.15.2+ent, 1.16.0-rc1
        let core = s
            .trim()
            .trim_start_matches('v')
            .split(['+', '-'])
            .next()
            .unwrap_or_default();

        let mut segments = core.split('.').map(|segment| segment.parse::<u64>());

        let mut next = || match segments.next() {
            Some(Ok(value)) => Ok(value),
            _ => Err(malformed()),
        };

        Ok(Self {
            major: next()?,
            minor: next()?,
            patch: next()?,
        })
    }
}

/// Ask Vault which release it runs.
///
/// # Errors
/// `Unreachable` if `sys/health` cannot be queried, `MalformedVersion` if the
/// version is missing or not `major.minor.patch`.
#[instrument(skip(client))]
pub async fn probe(client: &VaultClient) -> Result<BrokerVersion, ProbeError> {
    let health = client
        .health()
        .await
        .map_err(|e| ProbeError::Unreachable(e.to_string()))?;

    let version = health
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| ProbeError::MalformedVersion(String::new()))?
        .parse::<BrokerVersion>()?;

    debug!("Vault version {}", version);

    Ok(version)
}
