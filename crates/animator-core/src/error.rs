use animator_config::ConfigError;

use crate::capabilities::Dependency;

/// Errors surfaced by [`crate::TextAnimator`].
#[derive(Debug, thiserror::Error)]
pub enum AnimatorError {
    /// A required capability was not injected.
    #[error("{0} is required but was not provided to the text animator")]
    MissingDependency(Dependency),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// Refresh found no element carrying any mode marker.
    #[error("failed to refresh animations: no animatable elements found")]
    RefreshFailed,
}

pub type Result<T> = std::result::Result<T, AnimatorError>;
