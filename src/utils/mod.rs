// Utility functions
pub mod error;
pub mod crypto;

pub use error::*;
pub use crypto::*;
