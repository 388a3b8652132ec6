use crate::domain::model::SyncReport;
use crate::domain::ports::{BillingStore, BillingTransaction, ProvisioningSource};
use crate::utils::error::Result;

pub struct Reconciler<B: BillingStore, P: ProvisioningSource> {
    billing: B,
    provisioning: P,
    config_option_id: i64,
    dry_run: bool,
}

impl<B: BillingStore, P: ProvisioningSource> Reconciler<B, P> {
    pub fn new(billing: B, provisioning: P, config_option_id: i64) -> Self {
        Self {
            billing,
            provisioning,
            config_option_id,
            dry_run: false,
        }
    }

    /// Rolls back at the end of the pass instead of committing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// One pass, one transaction: either every update lands or none does.
    pub async fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::start();
        let mut tx = self.billing.begin().await?;

        match self.sync(&mut tx, &mut report).await {
            Ok(()) if self.dry_run => {
                tx.rollback().await?;
                report.finish(false);
                tracing::info!("Dry run finished; all changes rolled back");
                Ok(report)
            }
            Ok(()) => {
                tx.commit().await?;
                report.finish(true);
                tracing::info!("Memory configuration updated successfully");
                Ok(report)
            }
            Err(e) => {
                tracing::error!("An error occurred, rolling back: {}", e);
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Consumes the reconciler and closes the billing connection.
    pub async fn close(self) {
        self.billing.close().await;
    }

    async fn sync(&self, tx: &mut B::Transaction, report: &mut SyncReport) -> Result<()> {
        tracing::info!("Fetching active subscriptions...");
        let subscription_ids = tx.list_active_subscription_ids().await?;
        report.subscriptions_in_scope = subscription_ids.len();
        tracing::info!("Found {} active subscriptions", subscription_ids.len());

        tracing::info!("Fetching server memory from the panel...");
        let memory_by_subscription = self
            .provisioning
            .fetch_memory_by_subscription(&subscription_ids)
            .await?;
        report.servers_matched = memory_by_subscription.len();
        tracing::info!(
            "Matched {} servers to subscriptions",
            memory_by_subscription.len()
        );

        for (subscription_id, memory_mb) in memory_by_subscription {
            let outcome = tx
                .apply_memory_update(self.config_option_id, subscription_id, memory_mb)
                .await?;
            report.record(&outcome);
        }

        Ok(())
    }
}
