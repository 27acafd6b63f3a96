//! Pure domain types with minimal dependencies
//!
//! Types here know nothing about decoders, the filesystem or logging.

pub mod outcome;
pub mod serial;

pub use outcome::*;
pub use serial::*;
