//! Deployer credentials, directory identifiers, and secret handling.

pub mod credentials;
pub mod id;
pub mod secret;

pub use credentials::*;
pub use id::*;
pub use secret::*;
