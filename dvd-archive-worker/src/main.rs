use std::time::Duration;

use clap::Parser;
use dvd_archive_worker::{DEFAULT_IDLE_TIMEOUT, ServeConfig};

#[derive(Parser)]
#[command(name = "dvd-archive-worker")]
#[command(about = "Reads DVD navigation data on behalf of dvd-archive", long_about = None)]
struct Args {
    /// Seconds to wait for a request while no disc is open (0 waits forever)
    #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT.as_secs())]
    idle_timeout: u64,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let config = ServeConfig {
        idle_timeout: (args.idle_timeout > 0).then(|| Duration::from_secs(args.idle_timeout)),
    };

    log::debug!("Worker started (pid {})", std::process::id());
    if let Err(e) = dvd_archive_worker::serve(tokio::io::stdin(), tokio::io::stdout(), config).await
    {
        log::error!("Worker stopped: {e}");
        std::process::exit(1);
    }
}
