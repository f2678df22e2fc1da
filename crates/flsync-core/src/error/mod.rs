//! Error types for flsync
//!
//! Every fallible operation in the core returns [`FlResult`]. Variants carry a
//! human-readable message plus optional context so callers can log them
//! without losing where the failure happened.

mod constructors;
mod conversions;
mod types;

pub use types::{FlError, FlResult, ResultExt};
