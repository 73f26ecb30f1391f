//! User model and related types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User role as far as view gating is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile of the session user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl UserProfile {
    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else {
            Role::Reader
        }
    }
}

/// Registration request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Successful login payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginGrant {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(default)]
    pub user: UserProfile,
}

/// Current-user payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserPayload {
    pub user: UserProfile,
}
