//! Error types and result extensions for skylift operations

mod builders;
mod conversions;
mod display;
mod extensions;
mod types;

pub use builders::*;
pub use extensions::*;
pub use types::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failed_node() {
        let err = Error::execution("prod-stack", "deployment rejected");
        assert_eq!(
            err.to_string(),
            "execution of 'prod-stack' failed: deployment rejected"
        );
    }

    #[test]
    fn display_configuration() {
        let err = Error::configuration("concurrency must be at least 1");
        assert_eq!(
            err.to_string(),
            "configuration error: concurrency must be at least 1"
        );
    }

    #[test]
    fn execution_error_carries_source() {
        let source = anyhow::anyhow!("bucket does not exist");
        let err = Error::execution_with_source("file1-dest1-publish", source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("file1-dest1-publish"));
    }

    #[test]
    fn context_wraps_the_underlying_error() {
        let json: std::result::Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("{not json");
        let wrapped = json.context("failed to parse artifact");
        let message = wrapped.unwrap_err().to_string();
        assert!(message.contains("failed to parse artifact"));
    }
}
