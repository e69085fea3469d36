use std::path::PathBuf;

/// Errors raised while building or validating animator options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The options value was not a key/value object.
    #[error("invalid options: expected a key/value object, got {0}")]
    NotAnObject(&'static str),
    /// A recognized option carried a value of the wrong type.
    #[error("invalid option value: {0}")]
    Malformed(String),
    #[error("animation duration must be a positive number (got {0})")]
    InvalidDuration(f64),
    #[error("scroll trigger offset must be a non-negative number (got {0})")]
    InvalidOffset(f64),
    #[error("unknown ease curve '{0}'")]
    UnknownEase(String),
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
