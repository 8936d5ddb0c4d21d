mod builder;
pub use builder::Builder;

mod connect;
pub use connect::connect;

mod pool;
pub use pool::*;

use crate::{
    engine::{self, calculation, deleting::FieldDeletion},
    IsolationLevel, Result, Transaction,
};

use fieldcalc_core::{
    driver::{operation, Driver, Operation, Response},
    op::{FieldOpRecord, FieldOps},
    schema::{Cell, Field, FieldId, Link, LinkOptions, ReferenceGraph, Table, TableId, View},
    Error,
};

use std::{future::Future, pin::Pin, sync::Arc};

/// A future borrowing the transaction it runs in.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) pool: Pool,
    pub(crate) isolation: IsolationLevel,
    pub(crate) max_retries: usize,
}

/// A handle to the field store. Cloning is cheap; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Starts a transaction at the configured isolation level.
    pub async fn begin(&self) -> Result<Transaction> {
        let connection = self.shared.pool.get().await?;
        Transaction::begin(connection, self.shared.isolation).await
    }

    /// Runs `f` inside one transaction, committing if it succeeds and rolling
    /// back otherwise.
    ///
    /// A serialization failure re-runs `f` from scratch in a new transaction,
    /// up to the configured number of retries.
    pub async fn transaction<T, F>(&self, mut f: F) -> Result<T>
    where
        F: for<'t> FnMut(&'t mut Transaction) -> BoxFuture<'t, Result<T>>,
    {
        let mut attempt = 0;

        loop {
            let err = match self.try_transaction(&mut f).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_serialization_failure() || attempt >= self.shared.max_retries {
                return Err(err);
            }

            attempt += 1;
            log::warn!(
                "retrying transaction; attempt={attempt}; max_retries={}; err={err}",
                self.shared.max_retries
            );
        }
    }

    async fn try_transaction<T, F>(&self, f: &mut F) -> Result<T>
    where
        F: for<'t> FnMut(&'t mut Transaction) -> BoxFuture<'t, Result<T>>,
    {
        let mut tx = self.begin().await?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    log::warn!("rollback failed; err={rollback}");
                }
                Err(err)
            }
        }
    }

    /// Deletes a field, cleaning up everything that depends on it.
    ///
    /// Fails with a field not found error if `field_id` does not name a field
    /// of `table_id`, and with a forbidden error for a primary field. Either
    /// way nothing is written.
    pub async fn delete_field(&self, table_id: &TableId, field_id: &FieldId) -> Result<()> {
        let (table_id, field_id) = (table_id.clone(), field_id.clone());

        self.transaction(move |tx| {
            let deletion = FieldDeletion::new(table_id.clone(), field_id.clone());
            Box::pin(deletion.run(tx))
        })
        .await
    }

    pub async fn create_table(&self, name: &str) -> Result<Table> {
        let table = Table::new(name);

        self.exec(operation::InsertTable {
            table: table.clone(),
        })
        .await?;

        Ok(table)
    }

    /// Creates a field along with its reference edges, its junction storage
    /// if it is a link, and its column in every view of the table.
    pub async fn create_field(&self, field: Field) -> Result<Field> {
        self.transaction(move |tx| {
            let field = field.clone();
            Box::pin(async move {
                engine::creating::create_field(tx, &field).await?;
                Ok(field)
            })
        })
        .await
    }

    /// Creates a view listing the table's current fields.
    pub async fn create_view(&self, table_id: &TableId, name: &str) -> Result<View> {
        let view = View::new(table_id.clone(), name);

        self.transaction(move |tx| {
            let mut view = view.clone();
            Box::pin(async move {
                view.column_order = tx
                    .exec(operation::FindFields {
                        table_id: view.table_id.clone(),
                    })
                    .await?
                    .into_fields()?
                    .into_iter()
                    .map(|field| field.id)
                    .collect();

                tx.exec(operation::InsertView { view: view.clone() })
                    .await?;

                Ok(view)
            })
        })
        .await
    }

    /// Applies field ops as one batch. Fails without applying anything if an
    /// op's old value does not match the stored one.
    pub async fn update_fields(&self, table_id: &TableId, ops: Vec<FieldOps>) -> Result<()> {
        let table_id = table_id.clone();

        self.transaction(move |tx| {
            let (table_id, ops) = (table_id.clone(), ops.clone());
            Box::pin(async move { engine::mutator::batch_update_fields(tx, &table_id, ops).await })
        })
        .await
    }

    /// Invalidates the cached values of `field_ids` and queues them for
    /// recalculation.
    pub async fn reset_fields(&self, table_id: &TableId, field_ids: &[FieldId]) -> Result<()> {
        let (table_id, field_ids) = (table_id.clone(), field_ids.to_vec());

        self.transaction(move |tx| {
            let (table_id, field_ids) = (table_id.clone(), field_ids.clone());
            Box::pin(async move { calculation::reset_fields(tx, &table_id, &field_ids).await })
        })
        .await
    }

    /// Caches computed values.
    pub async fn write_cells(&self, table_id: &TableId, cells: Vec<Cell>) -> Result<()> {
        self.exec(operation::WriteCells {
            table_id: table_id.clone(),
            cells,
        })
        .await?;
        Ok(())
    }

    pub async fn cells(&self, field_ids: &[FieldId]) -> Result<Vec<Cell>> {
        self.exec(operation::QueryCells {
            field_ids: field_ids.to_vec(),
        })
        .await?
        .into_cells()
    }

    /// Fields of the table queued for recalculation.
    pub async fn pending_calculations(&self, table_id: &TableId) -> Result<Vec<FieldId>> {
        self.exec(operation::QueryPendingCalculations {
            table_id: table_id.clone(),
        })
        .await?
        .into_field_ids()
    }

    /// The operation log of the table's fields, oldest first.
    pub async fn field_ops(&self, table_id: &TableId) -> Result<Vec<FieldOpRecord>> {
        self.exec(operation::QueryFieldOps {
            table_id: table_id.clone(),
        })
        .await?
        .into_field_ops()
    }

    pub async fn field(&self, field_id: &FieldId) -> Result<Option<Field>> {
        self.exec(operation::FindField {
            field_id: field_id.clone(),
        })
        .await?
        .into_field()
    }

    pub async fn fields(&self, table_id: &TableId) -> Result<Vec<Field>> {
        self.exec(operation::FindFields {
            table_id: table_id.clone(),
        })
        .await?
        .into_fields()
    }

    pub async fn views(&self, table_id: &TableId) -> Result<Vec<View>> {
        self.exec(operation::FindViews {
            table_id: table_id.clone(),
        })
        .await?
        .into_views()
    }

    /// The reference edges touching any of `field_ids`.
    pub async fn references(&self, field_ids: &[FieldId]) -> Result<ReferenceGraph> {
        let edges = self
            .exec(operation::QueryReferences {
                field_ids: field_ids.to_vec(),
            })
            .await?
            .into_references()?;

        Ok(edges.into_iter().collect())
    }

    /// Stores record pairs in the junction storage of a link field.
    pub async fn link_records(&self, field_id: &FieldId, links: Vec<Link>) -> Result<()> {
        let options = self.owned_link_options(field_id).await?;
        self.exec(operation::InsertLinks { options, links }).await?;
        Ok(())
    }

    pub async fn links(&self, field_id: &FieldId) -> Result<Vec<Link>> {
        let options = self.owned_link_options(field_id).await?;
        self.exec(operation::QueryLinks { options })
            .await?
            .into_links()
    }

    async fn owned_link_options(&self, field_id: &FieldId) -> Result<LinkOptions> {
        let Some(field) = self.field(field_id).await? else {
            return Err(Error::field_not_found(field_id));
        };

        match field.owned_link_options() {
            Some(options) => Ok(options.clone()),
            None => Err(Error::forbidden(format!(
                "field {field_id} does not own a link relation"
            ))),
        }
    }

    /// Creates the store's tables if they do not exist yet.
    pub async fn push_schema(&self) -> Result<()> {
        self.shared.pool.get().await?.push_schema().await
    }

    pub fn driver(&self) -> &dyn Driver {
        self.shared.pool.driver()
    }

    /// Executes one operation outside of any transaction.
    async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        self.shared.pool.get().await?.exec(op.into()).await
    }
}
