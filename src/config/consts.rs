/// Environment variable holding the ambient key prefix
pub const KEY_PREFIX_ENV: &str = "WOODCHIPPER_KEY_PREFIX";
/// `strftime` format used by the timestamp processor
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M.%S";
/// Value injected by an argument logger when a path cannot be resolved
pub const DEFAULT_MISSING: &str = "<missing>";
/// Separator between segments of a dig path
pub const DEFAULT_PATH_DELIMITER: &str = ".";
/// Logger that scope exit events are emitted through
pub const CONTEXT_LOGGER_NAME: &str = "woodchipper.context";
