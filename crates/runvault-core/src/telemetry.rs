//! Logging setup for the `runvault` command.
//!
//! Logs go to stderr so stdout carries only command output such as `find`
//! listings and `analyze` breakdowns. The store lifecycle events from
//! [`crate::obs`] are `info!` level, so they show by default; `--verbose`
//! adds the `debug!` ingestion and restore detail, and `--json` turns every
//! line into a record that can be filtered on its `event` field. `RUST_LOG`
//! overrides both flags. Only the first call installs a subscriber.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber. `level` applies when `RUST_LOG` is unset.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
