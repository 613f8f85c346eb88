//! Logging setup
//!
//! The library only talks to the `log` facade. Applications pick the sink;
//! `init` installs `env_logger`, filtered through `RUST_LOG`.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with `env_logger`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
