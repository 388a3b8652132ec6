use crate::adapters::{MySqlBillingStore, PterodactylClient};
use crate::config::SyncConfig;
use crate::core::reconciler::Reconciler;
use crate::domain::model::SyncReport;
use crate::utils::error::SyncError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Connect,
    Sync,
}

#[derive(Error, Debug)]
#[error("{stage:?} stage failed: {error}")]
pub struct JobFailure {
    pub stage: JobStage,
    #[source]
    pub error: SyncError,
}

/// Connects to the billing database, then runs one reconcile pass against the
/// panel. Nothing touches the panel until the connection is up.
pub async fn run_job(config: &SyncConfig, dry_run: bool) -> Result<SyncReport, JobFailure> {
    let billing = MySqlBillingStore::connect(&config.billing)
        .await
        .map_err(|error| JobFailure {
            stage: JobStage::Connect,
            error,
        })?;

    let provisioning = PterodactylClient::new(&config.provisioning);
    let reconciler = Reconciler::new(billing, provisioning, config.billing.config_option_id)
        .with_dry_run(dry_run);

    let result = reconciler.run().await;
    reconciler.close().await;

    result.map_err(|error| JobFailure {
        stage: JobStage::Sync,
        error,
    })
}
