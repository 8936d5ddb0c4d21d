use super::{connect, Db, Pool, PoolConfig, Shared};
use crate::{driver::Driver, IsolationLevel, Result};

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Builder {
    isolation: IsolationLevel,

    /// Additional attempts for a unit of work failing with a serialization
    /// failure
    max_retries: usize,

    pool: PoolConfig,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            isolation: IsolationLevel::Serializable,
            max_retries: 0,
            pool: PoolConfig::default(),
        }
    }
}

impl Builder {
    /// Isolation level of the transactions the engine starts
    pub fn isolation(&mut self, isolation: IsolationLevel) -> &mut Self {
        self.isolation = isolation;
        self
    }

    /// How many times a transaction aborted by a conflicting write is re-run
    pub fn max_retries(&mut self, max_retries: usize) -> &mut Self {
        self.max_retries = max_retries;
        self
    }

    pub fn pool_max_size(&mut self, max_size: usize) -> &mut Self {
        self.pool.max_size = max_size;
        self
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build_boxed(connect(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.build_boxed(Box::new(driver)).await
    }

    async fn build_boxed(&mut self, driver: Box<dyn Driver>) -> Result<Db> {
        let pool = Pool::new(driver, self.pool.clone())?;

        let db = Db {
            shared: Arc::new(Shared {
                pool,
                isolation: self.isolation,
                max_retries: self.max_retries,
            }),
        };

        db.push_schema().await?;
        Ok(db)
    }
}
