mod address;
mod hash;
mod signature;

pub mod error;

pub use address::*;
pub use error::CryptoError;
pub use hash::*;
pub use signature::*;
