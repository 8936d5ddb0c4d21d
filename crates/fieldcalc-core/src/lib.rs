pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::Error;

pub mod op;

pub mod schema;
pub use schema::{Field, FieldId, TableId};

/// A Result type alias that uses fieldcalc's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
