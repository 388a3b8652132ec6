pub mod job;
pub mod reconciler;

pub use crate::domain::model::{OptionId, SubscriptionId, SyncReport, UpdateOutcome};
pub use crate::domain::ports::{BillingStore, BillingTransaction, ProvisioningSource};
pub use crate::utils::error::Result;
