pub mod jwks_verifier;
pub mod middleware;
pub mod request_id;

pub use jwks_verifier::JwksVerifier;
pub use middleware::auth_middleware;
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
