pub mod db;
pub use db::Db;

pub mod engine;

mod transaction;
pub use transaction::Transaction;

pub use fieldcalc_core::{
    driver::{self, operation::IsolationLevel},
    op, schema, Error, Result,
};
