//! Runs one siege with the default castle and logs every event.
//!
//! Log verbosity follows `CASTLEWATCH_LOG` (default `info`).

use std::sync::Arc;

use castlewatch::{Config, LogWriter, Siege, Subscribe};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("CASTLEWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let siege = Siege::builder(Config::default())
        .with_subscribers(subs)
        .build()?;

    let mut rng = StdRng::from_os_rng();
    siege.run(&mut rng).await?;
    Ok(())
}
