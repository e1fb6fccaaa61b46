//! Project Hub CLI Library
//!
//! Command implementations for the `projecthub` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, serve, check)
//! - [`server`] - HTTP serving of the generated documents
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use projecthub::cmd;
//!
//! # async fn demo() -> color_eyre::eyre::Result<()> {
//! cmd::build::run(Path::new("projecthub.toml"), None, None, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;
pub mod server;

pub use projecthub_core::Config;
pub use projecthub_generator::{BuildStats, Builder};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
