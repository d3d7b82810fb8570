use http::StatusCode;
use hxcomp_core::TokenError;
use std::path::PathBuf;
use thiserror::Error;

/// Marker for "the thing this request refers to does not exist".
///
/// Return it (directly or wrapped in context) from hydration or an action
/// to get a 404 from the default error policy.
#[derive(Debug, Clone, Copy, Error)]
#[error("not found")]
pub struct NotFound;

pub fn not_found() -> anyhow::Error {
    anyhow::Error::new(NotFound)
}

/// Failure inside the component request lifecycle.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("hydration failed: {0:#}")]
    Hydration(anyhow::Error),
    #[error("action failed: {0:#}")]
    Action(anyhow::Error),
    #[error("render failed: {0:#}")]
    Render(anyhow::Error),
}

impl ComponentError {
    fn source_chain(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Token(_) => None,
            Self::Hydration(e) | Self::Action(e) | Self::Render(e) => Some(e),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.source_chain()
            .is_some_and(|e| e.chain().any(|cause| cause.is::<NotFound>()))
    }

    /// Client-supplied token could not be trusted.
    pub fn is_bad_request(&self) -> bool {
        match self {
            Self::Token(e) => e.is_client_error(),
            other => other
                .source_chain()
                .and_then(|e| e.downcast_ref::<TokenError>())
                .is_some_and(TokenError::is_client_error),
        }
    }

    /// Status chosen by the default error policy.
    pub fn status(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("route prefix {prefix} is already registered (component {name:?} constructed twice at one call site)")]
    PrefixCollision { prefix: String, name: String },
    #[error("component {component:?} registers action {action:?} more than once")]
    DuplicateAction { component: String, action: String },
    #[error("component {0:?} was described by a different registry")]
    ForeignDescriptor(String),
    #[error(transparent)]
    Key(#[from] TokenError),
    #[error("component table lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
