//! Utility Functions
//!
//! User-friendly error formatting for the binary.
//!
//! ```rust,ignore
//! use hand_pointer::utils::format_user_error;
//!
//! if let Err(e) = run() {
//!     eprintln!("{}", format_user_error(&e));
//! }
//! ```
//!
//! Error categories with context-aware help:
//! - Model provisioning errors → runtime load attempts, detector settings
//! - Trace errors → file path, line format
//! - Config errors → file location, syntax, value ranges

pub mod errors;

pub use errors::format_user_error;
