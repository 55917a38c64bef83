//! Core error types for the `skylift` workspace.
//!
//! This crate establishes the failure modes shared by every other skylift
//! crate. It aims to provide clear, type-safe, and consistent building
//! blocks.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes for predictable error handling.

pub mod errors;

pub use self::errors::{Error, Result, ResultExt};
