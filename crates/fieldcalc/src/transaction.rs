use crate::{db::PoolConnection, IsolationLevel, Result};

use fieldcalc_core::{
    driver::{operation::Transaction as TransactionOp, Operation, Response},
    err,
};

/// An open store transaction.
///
/// Every store call made through the transaction becomes durable only on
/// [`commit`](Transaction::commit). A transaction dropped without being
/// committed or rolled back is rolled back in the background.
#[derive(Debug)]
pub struct Transaction {
    connection: Option<PoolConnection>,
}

impl Transaction {
    pub(crate) async fn begin(
        mut connection: PoolConnection,
        isolation: IsolationLevel,
    ) -> Result<Transaction> {
        connection
            .exec(TransactionOp::Start { isolation }.into())
            .await?;

        Ok(Transaction {
            connection: Some(connection),
        })
    }

    /// Executes one store operation. Each call is one round trip.
    pub async fn exec(&mut self, op: impl Into<Operation>) -> Result<Response> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(err!("transaction already finished"));
        };
        connection.exec(op.into()).await
    }

    pub async fn commit(mut self) -> Result<()> {
        self.finish(TransactionOp::Commit).await
    }

    pub async fn rollback(mut self) -> Result<()> {
        self.finish(TransactionOp::Rollback).await
    }

    async fn finish(&mut self, op: TransactionOp) -> Result<()> {
        self.exec(op).await?;
        // Only a finished transaction hands its connection back
        self.connection = None;
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = connection.exec(TransactionOp::Rollback.into()).await {
                        log::warn!("rollback of dropped transaction failed; err={err}");
                    }
                });
            }
            Err(_) => {
                // Without a runtime the connection cannot be rolled back, so it
                // must not return to the pool
                drop(connection.detach());
            }
        }
    }
}
