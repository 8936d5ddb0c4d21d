

mod db_test;
pub use db_test::DbTest;

pub use exec_log::ExecLog;


mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

use fieldcalc::driver::Driver;

/// A store the integration tests run against.
pub trait Setup: Send + Sync + 'static {
    /// A fresh, empty store.
    fn driver(&self) -> Box<dyn Driver>;

    /// Store-specific builder settings
    fn configure_builder(&self, _builder: &mut fieldcalc::db::Builder) {}
}
