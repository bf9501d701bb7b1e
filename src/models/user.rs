//! User and credential models.

use serde::{Deserialize, Serialize};

/// An authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for registering.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for a password reset.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Issued session token together with its user.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub token: String,
    pub user: User,
}
