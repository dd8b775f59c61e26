pub mod error;
pub mod identity;

pub use error::AuthError;
pub use identity::{Claims, Identity, IdentityVerifier};
