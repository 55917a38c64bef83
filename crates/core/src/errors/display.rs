//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Assembly {
                artifact_id,
                message,
            } => {
                write!(f, "invalid artifact '{artifact_id}': {message}")
            }
            Error::Graph { message } => {
                write!(f, "work graph error: {message}")
            }
            Error::Execution {
                node_id, message, ..
            } => {
                write!(f, "execution of '{node_id}' failed: {message}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
