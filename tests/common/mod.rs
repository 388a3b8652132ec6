#![allow(dead_code)]

use async_trait::async_trait;
use memory_sync::config::ProvisioningConfig;
use memory_sync::core::{BillingStore, BillingTransaction, OptionId, SubscriptionId};
use memory_sync::{Result, SyncError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const GROUP_ID: i64 = 1;
pub const BACKEND_ID: i64 = 1;

#[derive(Debug, Clone)]
pub struct Hosting {
    pub id: i64,
    pub status: &'static str,
    pub server: i64,
}

/// `(optionid, qty)` per `(configid, relid)`.
pub type HostingOptions = BTreeMap<(i64, i64), (i64, i64)>;

#[derive(Debug, Clone, Default)]
pub struct BillingState {
    pub hosting: Vec<Hosting>,
    /// `(id, configid, optionname)`
    pub options: Vec<(i64, i64, String)>,
    pub hosting_options: HostingOptions,
}

impl BillingState {
    pub fn with_subscription(mut self, id: i64, status: &'static str, server: i64) -> Self {
        self.hosting.push(Hosting { id, status, server });
        self
    }

    pub fn with_option(mut self, id: i64, group: i64, label: &str) -> Self {
        self.options.push((id, group, label.to_string()));
        self
    }

    pub fn with_hosting_option(mut self, group: i64, relid: i64, optionid: i64, qty: i64) -> Self {
        self.hosting_options.insert((group, relid), (optionid, qty));
        self
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub closed: bool,
}

/// Transactional in-memory stand-in for the WHMCS tables. A transaction works
/// on a copy that replaces the shared state on commit.
#[derive(Clone)]
pub struct InMemoryBilling {
    pub state: Arc<Mutex<BillingState>>,
    pub counters: Arc<Mutex<Counters>>,
    server_id: i64,
    fail_on_assign: Option<i64>,
}

impl InMemoryBilling {
    pub fn new(state: BillingState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            counters: Arc::new(Mutex::new(Counters::default())),
            server_id: BACKEND_ID,
            fail_on_assign: None,
        }
    }

    pub fn failing_on(mut self, subscription_id: i64) -> Self {
        self.fail_on_assign = Some(subscription_id);
        self
    }

    pub async fn hosting_options(&self) -> HostingOptions {
        self.state.lock().await.hosting_options.clone()
    }
}

pub struct InMemoryTransaction {
    working: BillingState,
    shared: Arc<Mutex<BillingState>>,
    counters: Arc<Mutex<Counters>>,
    server_id: i64,
    fail_on_assign: Option<i64>,
}

#[async_trait]
impl BillingStore for InMemoryBilling {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction> {
        self.counters.lock().await.begins += 1;
        Ok(InMemoryTransaction {
            working: self.state.lock().await.clone(),
            shared: Arc::clone(&self.state),
            counters: Arc::clone(&self.counters),
            server_id: self.server_id,
            fail_on_assign: self.fail_on_assign,
        })
    }

    async fn close(&self) {
        self.counters.lock().await.closed = true;
    }
}

#[async_trait]
impl BillingTransaction for InMemoryTransaction {
    async fn list_active_subscription_ids(&mut self) -> Result<BTreeSet<SubscriptionId>> {
        Ok(self
            .working
            .hosting
            .iter()
            .filter(|h| h.status == "Active" && h.server == self.server_id)
            .map(|h| SubscriptionId(h.id))
            .collect())
    }

    async fn find_option_id(&mut self, group_id: i64, label: &str) -> Result<Option<OptionId>> {
        Ok(self
            .working
            .options
            .iter()
            .find(|(_, group, name)| *group == group_id && name == label)
            .map(|(id, _, _)| OptionId(*id)))
    }

    async fn assign_option(
        &mut self,
        group_id: i64,
        subscription_id: SubscriptionId,
        option_id: OptionId,
    ) -> Result<u64> {
        if self.fail_on_assign == Some(subscription_id.0) {
            return Err(SyncError::DatabaseError(sqlx::Error::Protocol(format!(
                "lock wait timeout for relid {}",
                subscription_id
            ))));
        }

        match self
            .working
            .hosting_options
            .get_mut(&(group_id, subscription_id.0))
        {
            Some(row) => {
                *row = (option_id.0, 1);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn commit(self) -> Result<()> {
        let InMemoryTransaction {
            working,
            shared,
            counters,
            ..
        } = self;
        *shared.lock().await = working;
        counters.lock().await.commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.counters.lock().await.rollbacks += 1;
        Ok(())
    }
}

pub fn provisioning_config(base_url: String) -> ProvisioningConfig {
    ProvisioningConfig {
        base_url,
        api_key: "ptla_test_key".to_string(),
        per_page: 100,
    }
}

pub fn server(external_id: serde_json::Value, memory: u64) -> serde_json::Value {
    serde_json::json!({
        "object": "server",
        "attributes": {
            "external_id": external_id,
            "limits": { "memory": memory, "swap": 0, "disk": 5120 }
        }
    })
}

pub fn server_page(
    servers: Vec<serde_json::Value>,
    current_page: u64,
    total_pages: u64,
) -> serde_json::Value {
    serde_json::json!({
        "object": "list",
        "data": servers,
        "meta": {
            "pagination": {
                "per_page": 100,
                "current_page": current_page,
                "total_pages": total_pages
            }
        }
    })
}
