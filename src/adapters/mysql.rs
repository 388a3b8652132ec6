use crate::config::BillingConfig;
use crate::domain::model::{OptionId, SubscriptionId};
use crate::domain::ports::{BillingStore, BillingTransaction};
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{MySql, Transaction};
use std::collections::BTreeSet;
use std::time::Duration;

// Ids are cast so INT and INT UNSIGNED columns both decode as i64.
const ACTIVE_SUBSCRIPTIONS_SQL: &str =
    "SELECT CAST(id AS SIGNED) FROM tblhosting WHERE domainstatus = 'Active' AND server = ?";

const FIND_OPTION_SQL: &str = "SELECT CAST(id AS SIGNED) FROM tblproductconfigoptionssub \
     WHERE configid = ? AND optionname = ? LIMIT 1";

const ASSIGN_OPTION_SQL: &str =
    "UPDATE tblhostingconfigoptions SET optionid = ?, qty = 1 WHERE configid = ? AND relid = ?";

/// WHMCS database. The pool holds a single connection, used serially.
pub struct MySqlBillingStore {
    pool: MySqlPool,
    server_id: i64,
}

impl MySqlBillingStore {
    pub async fn connect(config: &BillingConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password);

        tracing::debug!(
            "Connecting to billing database {}@{}:{}/{}",
            config.username,
            config.host,
            config.port,
            config.database
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            server_id: config.server_id,
        })
    }
}

#[async_trait]
impl BillingStore for MySqlBillingStore {
    type Transaction = MySqlBillingTransaction;

    async fn begin(&self) -> Result<MySqlBillingTransaction> {
        let tx = self.pool.begin().await?;
        Ok(MySqlBillingTransaction {
            tx,
            server_id: self.server_id,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Billing database connection closed");
    }
}

pub struct MySqlBillingTransaction {
    tx: Transaction<'static, MySql>,
    server_id: i64,
}

#[async_trait]
impl BillingTransaction for MySqlBillingTransaction {
    async fn list_active_subscription_ids(&mut self) -> Result<BTreeSet<SubscriptionId>> {
        let ids: Vec<i64> = sqlx::query_scalar(ACTIVE_SUBSCRIPTIONS_SQL)
            .bind(self.server_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(ids.into_iter().map(SubscriptionId).collect())
    }

    async fn find_option_id(&mut self, group_id: i64, label: &str) -> Result<Option<OptionId>> {
        let id: Option<i64> = sqlx::query_scalar(FIND_OPTION_SQL)
            .bind(group_id)
            .bind(label)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(id.map(OptionId))
    }

    async fn assign_option(
        &mut self,
        group_id: i64,
        subscription_id: SubscriptionId,
        option_id: OptionId,
    ) -> Result<u64> {
        let result = sqlx::query(ASSIGN_OPTION_SQL)
            .bind(option_id.0)
            .bind(group_id)
            .bind(subscription_id.0)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
