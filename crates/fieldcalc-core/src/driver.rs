mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, Result};

use std::{borrow::Cow, fmt::Debug};

/// A store backend able to open connections.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The connection URL the driver was created from.
    fn url(&self) -> Cow<'_, str>;

    /// Opens a new connection to the store.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Upper bound of concurrently open connections, if the store has one.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// An open connection to the store. Each executed operation is one round trip.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a store operation
    async fn exec(&mut self, op: Operation) -> Result<Response>;

    /// Create the store's tables if they do not exist yet.
    async fn push_schema(&mut self) -> Result<()>;
}
