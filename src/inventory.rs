use crate::endpoint::CandidateInstance;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_rds::{Client, error::DisplayErrorContext};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("unable to query RDS: {0}")]
    Query(String),
}

/// Source of database endpoints to match Vault connections against.
#[allow(async_fn_in_trait)]
pub trait Inventory {
    /// # Errors
    /// Returns an error if the listing cannot be retrieved.
    async fn list_instances(&self) -> Result<Vec<CandidateInstance>, InventoryError>;
}

fn candidate(address: Option<&str>, port: Option<i32>) -> Option<CandidateInstance> {
    Some(CandidateInstance {
        address: address?.to_string(),
        port: u16::try_from(port?).ok()?,
    })
}

/// RDS instances and Aurora cluster endpoints in one region.
#[derive(Debug, Clone)]
pub struct RdsInventory {
    client: Client,
}

impl RdsInventory {
    /// Load AWS configuration from the environment for `region`.
    pub async fn new(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }
}

impl Inventory for RdsInventory {
    #[instrument(skip(self))]
    async fn list_instances(&self) -> Result<Vec<CandidateInstance>, InventoryError> {
        let mut candidates = Vec::new();

        let mut instances = self.client.describe_db_instances().into_paginator().send();
        while let Some(page) = instances.next().await {
            let page = page.map_err(|e| InventoryError::Query(DisplayErrorContext(e).to_string()))?;

            candidates.extend(page.db_instances().iter().filter_map(|db| {
                let endpoint = db.endpoint()?;
                candidate(endpoint.address(), endpoint.port())
            }));
        }

        // Vault is often pointed at an Aurora cluster endpoint, which no
        // instance reports.
        let mut clusters = self.client.describe_db_clusters().into_paginator().send();
        while let Some(page) = clusters.next().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    warn!("skipping Aurora clusters: {}", DisplayErrorContext(e));
                    break;
                }
            };

            for cluster in page.db_clusters() {
                candidates.extend(candidate(cluster.endpoint(), cluster.port()));
                candidates.extend(candidate(cluster.reader_endpoint(), cluster.port()));
            }
        }

        debug!("RDS returned {} endpoints", candidates.len());

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_requires_address_and_port() {
        assert_eq!(
            candidate(Some("hive.example.com"), Some(5432)),
            Some(CandidateInstance {
                address: "hive.example.com".to_string(),
                port: 5432
            })
        );
        assert_eq!(candidate(None, Some(5432)), None);
        assert_eq!(candidate(Some("hive.example.com"), None), None);
        assert_eq!(candidate(Some("hive.example.com"), Some(-1)), None);
    }
}
