pub mod auth;
pub mod narration;
pub mod podcast;
pub mod user;
