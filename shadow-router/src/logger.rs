//! Logging.

use std::{io::IsTerminal, path::Path};

use shadow_router_config::{Config, Error, General, LogFormat};
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    prelude::*,
    EnvFilter,
};

/// Subscriber writing to `writer`. `RUST_LOG` takes precedence
/// over the configured level.
pub fn subscriber<W>(general: &General, writer: W, ansi: bool) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = general
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);

    match general.log_format {
        LogFormat::Text => Box::new(
            registry.with(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_file(false)
                    .with_writer(writer),
            ),
        ),
        LogFormat::Json => Box::new(registry.with(fmt::layer().json().with_writer(writer))),
    }
}

/// Install the global subscriber.
pub fn init(general: &General) {
    subscriber(general, std::io::stderr, std::io::stderr().is_terminal()).init();
}

/// Load the configuration, logging with settings from the environment
/// until the configured subscriber is installed.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, Error> {
    let bootstrap = subscriber(
        &General::default(),
        std::io::stderr,
        std::io::stderr().is_terminal(),
    );

    tracing::subscriber::with_default(bootstrap, || Config::load(path))
}
