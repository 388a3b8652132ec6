use crate::config::ProvisioningConfig;
use crate::domain::model::SubscriptionId;
use crate::domain::ports::ProvisioningSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Deserialize)]
struct ServerList {
    data: Vec<ServerObject>,
    #[serde(default)]
    meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
struct ServerObject {
    attributes: ServerAttributes,
}

#[derive(Debug, Deserialize)]
struct ServerAttributes {
    #[serde(default)]
    external_id: serde_json::Value,
    limits: ServerLimits,
}

#[derive(Debug, Deserialize)]
struct ServerLimits {
    memory: u64,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    current_page: u64,
    total_pages: u64,
}

/// Pterodactyl application API.
pub struct PterodactylClient {
    client: Client,
    servers_url: String,
    api_key: String,
    per_page: u64,
}

impl PterodactylClient {
    pub fn new(config: &ProvisioningConfig) -> Self {
        Self {
            client: Client::new(),
            servers_url: format!(
                "{}/api/application/servers",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            per_page: config.per_page,
        }
    }

    async fn fetch_page(&self, page: u64) -> Result<ServerList> {
        tracing::debug!("Making API request to: {} (page {})", self.servers_url, page);
        let response = self
            .client
            .get(&self.servers_url)
            .query(&[("per_page", self.per_page), ("page", page)])
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());
        let body = response.error_for_status()?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ProvisioningSource for PterodactylClient {
    async fn fetch_memory_by_subscription(
        &self,
        subscription_ids: &BTreeSet<SubscriptionId>,
    ) -> Result<BTreeMap<SubscriptionId, u64>> {
        let mut memory_by_subscription = BTreeMap::new();
        let mut page: u64 = 1;

        loop {
            let list = self.fetch_page(page).await?;
            let received = list.data.len();

            for server in list.data {
                let attributes = server.attributes;
                let Some(id) = SubscriptionId::from_external_id(&attributes.external_id) else {
                    continue;
                };
                if !subscription_ids.contains(&id) {
                    continue;
                }
                if let Some(previous) = memory_by_subscription.insert(id, attributes.limits.memory)
                {
                    tracing::warn!(
                        "Several servers carry external id {}; {}MB replaced by {}MB",
                        id,
                        previous,
                        attributes.limits.memory
                    );
                }
            }

            let Some(pagination) = list.meta.and_then(|meta| meta.pagination) else {
                break;
            };
            if pagination.current_page < page {
                tracing::warn!(
                    "Panel answered page {} for page {}; stopping pagination",
                    pagination.current_page,
                    page
                );
                break;
            }
            if received == 0 || page >= pagination.total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(
            "Matched {} provisioned servers to billing subscriptions",
            memory_by_subscription.len()
        );
        Ok(memory_by_subscription)
    }
}
