//! A worker serve loop running inside the test process.

use dvd_archive_worker::ServeConfig;

use crate::connection::{Connect, Connection, Notifications};

pub(crate) struct InProcessWorker;

impl Connect for InProcessWorker {
    fn connect(&self) -> (Connection, Notifications) {
        let (client_out, worker_in) = tokio::io::duplex(4096);
        let (worker_out, client_in) = tokio::io::duplex(1 << 16);
        let config = ServeConfig { idle_timeout: None };
        tokio::spawn(dvd_archive_worker::serve(worker_in, worker_out, config));
        Connection::over(client_in, client_out)
    }
}
