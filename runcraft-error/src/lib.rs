//! # runcraft-error
//!
//! Unified error handling for runcraft.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. MissingCredential, UnknownTaskType)
//! - **ErrorStatus**: whether a caller may try again (Permanent, Temporary)
//! - **Error Context**: key-value pairs that help locate the cause
//! - **Error Source**: the wrapped underlying error, kept opaque
//!
//! ## Usage
//!
//! ```rust
//! use runcraft_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidParameter, "temperature must be within [0, 1]")
//!         .with_operation("config::build")
//!         .with_context("temperature", "1.5"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, runcraft_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - An error is handled once; later layers only append context
//! - No blanket `From<OtherError>` impls, so raw errors don't leak

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using runcraft Error
pub type Result<T> = std::result::Result<T, Error>;
