//! Build metadata baked in at compile time.

/// The package version of the service.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if `MOVIES_REVISION` was set during the build.
pub const REVISION: Option<&str> = option_env!("MOVIES_REVISION");

/// The build timestamp, if `BUILD_TIMESTAMP` was set during the build.
pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");

/// The name reported in health checks and log lines.
pub const SERVICE_NAME: &str = "movies";
