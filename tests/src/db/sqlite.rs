use fieldcalc::driver::Driver;
use fieldcalc_driver_sqlite::Sqlite;

use crate::Setup;

pub struct SetupSqlite;

impl Setup for SetupSqlite {
    fn driver(&self) -> Box<dyn Driver> {
        // Each connection to an in-memory store is its own empty store
        Box::new(Sqlite::in_memory())
    }
}
