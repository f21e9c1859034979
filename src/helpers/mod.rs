//! Helper Utilities
//!
//! Common utilities used across the application.

mod bounded;
mod crypto;
mod fs;

pub use bounded::*;
pub use crypto::*;
pub use fs::*;
