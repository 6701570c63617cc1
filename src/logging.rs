//! Logger bootstrap for embedding applications.
//!
//! The crate logs through the `log` facade only. Enable the `logger-support`
//! feature to get an `env_logger` backend configured from `RUST_LOG`.

/// Install `env_logger` as the global logger. Calling it again is a no-op.
#[cfg(feature = "logger-support")]
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Without `logger-support` the embedding application installs its own logger.
#[cfg(not(feature = "logger-support"))]
pub fn init() {}
