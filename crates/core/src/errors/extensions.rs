//! Result extension traits

use super::types::{Error, Result};

/// Attach human-readable context to a fallible operation
pub trait ResultExt<T> {
    /// Wrap the error with a fixed context message
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Wrap the error with a lazily-built context message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|error| {
            let inner = error.into();
            Error::Configuration {
                message: format!("{}: {}", message.into(), inner),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|error| {
            let inner = error.into();
            Error::Configuration {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}
