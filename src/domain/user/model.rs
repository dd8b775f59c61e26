use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::auth::Identity;

/// A caller seen at least once, keyed by the identity provider's subject
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_identity(identity: &Identity, created_at: DateTime<Utc>) -> Self {
        Self {
            id: identity.subject.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            created_at,
        }
    }
}
