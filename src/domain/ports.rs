use crate::domain::model::{OptionId, SubscriptionId, UpdateOutcome};
use crate::domain::option_label::format_memory_option;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

#[async_trait]
pub trait BillingStore: Send + Sync {
    type Transaction: BillingTransaction;

    async fn begin(&self) -> Result<Self::Transaction>;
    async fn close(&self);
}

/// The single transaction a sync pass runs in. Dropping it without
/// `commit` discards every write.
#[async_trait]
pub trait BillingTransaction: Send {
    /// Ids of active subscriptions bound to the configured provisioning backend.
    async fn list_active_subscription_ids(&mut self) -> Result<BTreeSet<SubscriptionId>>;

    async fn find_option_id(&mut self, group_id: i64, label: &str) -> Result<Option<OptionId>>;

    /// Points the subscription's option in `group_id` at `option_id` with qty 1.
    /// Returns rows affected; an absent row is not an error.
    async fn assign_option(
        &mut self,
        group_id: i64,
        subscription_id: SubscriptionId,
        option_id: OptionId,
    ) -> Result<u64>;

    async fn commit(self) -> Result<()>;
    async fn rollback(self) -> Result<()>;

    async fn apply_memory_update(
        &mut self,
        group_id: i64,
        subscription_id: SubscriptionId,
        memory_mb: u64,
    ) -> Result<UpdateOutcome> {
        let label = format_memory_option(memory_mb);
        tracing::info!(
            "Updating service config for service {} with {}",
            subscription_id,
            label
        );

        let Some(option_id) = self.find_option_id(group_id, &label).await? else {
            tracing::info!(
                "No option ID found for {} linked to service {}; skipping update",
                memory_mb,
                subscription_id
            );
            return Ok(UpdateOutcome::NoMatchingOption { label });
        };

        tracing::debug!(
            "Found option ID {} for {} linked to service {}",
            option_id,
            memory_mb,
            subscription_id
        );
        let rows_affected = self
            .assign_option(group_id, subscription_id, option_id)
            .await?;

        if rows_affected == 0 {
            tracing::warn!(
                "Service {} has no config option row in group {}; nothing updated",
                subscription_id,
                group_id
            );
        } else {
            tracing::info!(
                "Updated service config for service {} with {}MB memory",
                subscription_id,
                memory_mb
            );
        }

        Ok(UpdateOutcome::Updated {
            option_id,
            rows_affected,
        })
    }
}

#[async_trait]
pub trait ProvisioningSource: Send + Sync {
    /// Memory limit in MB for every provisioned server whose external id is in
    /// `subscription_ids`.
    async fn fetch_memory_by_subscription(
        &self,
        subscription_ids: &BTreeSet<SubscriptionId>,
    ) -> Result<BTreeMap<SubscriptionId, u64>>;
}
