use crate::{
    logging_driver::{DriverOp, LoggingDriver},
    ExecLog, Setup,
};
use fieldcalc::{driver::Driver, Db};
use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

/// Per-test state: the store setup and the log of every operation the test's
/// `Db` sent to the store.
///
/// Tests run on a current-thread runtime owned by [`DbTest::run`], so a
/// transaction dropped at the end of a test is still rolled back.
pub struct DbTest {
    setup: Box<dyn Setup>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl DbTest {
    pub fn run<F>(setup: Box<dyn Setup>, test_fn: F)
    where
        F: for<'a> FnOnce(&'a mut DbTest) -> Pin<Box<dyn Future<Output = ()> + 'a>>,
    {
        let _ = env_logger::builder().is_test(true).try_init();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        let mut test = DbTest {
            setup,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        };

        runtime.block_on(test_fn(&mut test));
    }

    /// Try to set up a database, returns Result for error handling
    pub async fn try_setup_db(&mut self, mut builder: fieldcalc::db::Builder) -> fieldcalc::Result<Db> {
        self.setup.configure_builder(&mut builder);

        let logging_driver = LoggingDriver::new(self.setup.driver());
        self.ops_log = logging_driver.ops_log_handle();

        builder.build(logging_driver).await
    }

    /// Set up a database with the default configuration
    pub async fn setup_db(&mut self) -> Db {
        self.try_setup_db(Db::builder()).await.unwrap()
    }

    /// A fresh store driver, for tests wrapping it themselves
    pub fn driver(&self) -> Box<dyn Driver> {
        self.setup.driver()
    }

    /// Operations executed since the last `clear`
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }
}
