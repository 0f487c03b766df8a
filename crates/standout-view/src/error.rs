//! Error types for view rendering.
//!
//! This module provides [`ViewError`], the single error type returned by every
//! fallible operation in the crate. It abstracts over the template library's
//! errors so that callers can match on the conditions that matter to them:
//!
//! - [`ViewError::ViewNotFound`] is recoverable. The controller turns it into
//!   empty content and the engine chain moves on to the next engine.
//! - [`ViewError::CircularRender`] and [`ViewError::ReservedKey`] are
//!   configuration bugs and always surface to the caller.
//! - Everything else is a hard failure propagated unchanged.
//!
//! `ViewError` is `Clone` because it travels through minijinja's error source
//! chain when a template calls back into the controller, and is recovered from
//! there by [`ViewError::from_template_error`].

use std::path::PathBuf;

use crate::data::DataMap;

/// Error type for view rendering operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ViewError {
    /// No engine could locate the view.
    #[error("View [{view}] not found.")]
    ViewNotFound {
        /// The view name that was requested.
        view: String,
        /// The data the view would have been rendered with.
        data: DataMap,
    },

    /// A view asked to render itself while still on the active render stack.
    #[error("The [{0}] cannot be called inside of its own view to prevent circular dependency.")]
    CircularRender(String),

    /// Render data defined a key reserved by the controller.
    #[error("[{0}] is a reserved data key.")]
    ReservedKey(String),

    /// Template syntax error or failure while evaluating a template.
    #[error("template error: {0}")]
    Template(String),

    /// Data could not be converted to or from a template value.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading a view or configuration file failed.
    #[error("I/O error reading {}: {message}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// No extension is registered under the requested name.
    #[error("extension [{0}] does not exist")]
    UnknownExtension(String),

    /// An extension handler reported a failure.
    #[error("extension error: {0}")]
    Extension(String),
}

impl ViewError {
    /// Creates a not-found error for `view`.
    pub fn not_found(view: impl Into<String>, data: DataMap) -> Self {
        Self::ViewNotFound {
            view: view.into(),
            data,
        }
    }

    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Returns true for [`ViewError::ViewNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ViewNotFound { .. })
    }

    /// Converts a minijinja error, recovering any `ViewError` raised by a
    /// nested controller call inside the template.
    ///
    /// The nearest `ViewError` in the source chain wins; otherwise the error
    /// kind is mapped the same way as [`From<minijinja::Error>`].
    pub fn from_template_error(err: minijinja::Error) -> Self {
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            if let Some(view_err) = cause.downcast_ref::<ViewError>() {
                return view_err.clone();
            }
            source = cause.source();
        }
        Self::from(err)
    }

    /// Wraps this error so it can be returned from a template-facing method.
    pub(crate) fn into_template_error(self) -> minijinja::Error {
        minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, self.to_string())
            .with_source(self)
    }
}

impl From<minijinja::Error> for ViewError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => ViewError::ViewNotFound {
                view: err.name().unwrap_or_default().to_string(),
                data: DataMap::new(),
            },
            ErrorKind::BadSerialization => ViewError::Serialization(err.to_string()),
            _ => ViewError::Template(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ViewError {
    fn from(err: serde_yaml::Error) -> Self {
        ViewError::Config(err.to_string())
    }
}
