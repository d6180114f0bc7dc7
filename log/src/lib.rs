use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

/// Builds the root JSON logger writing to stderr. With the
/// `env_logging` feature, records are filtered through `RUST_LOG`.
pub fn initialize_logger() -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);

    #[cfg(feature = "env_logging")]
    let drain = slog_envlogger::new(drain).ignore_res();

    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!(
            "service" => info::SERVICE_NAME,
            "version" => info::VERSION,
            "revision" => info::REVISION,
            "build_timestamp" => info::BUILD_TIMESTAMP
        ),
    )
}

/// A logger that drops every record. Meant for tests and tools that
/// need an `Environment` without output.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

