use serde::{Deserialize, Serialize};

use crate::domain::a001_member::{MemberInfo, MemberRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub member_id: String,
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub member: MemberInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Verified-old-PIN exchange payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePinRequest {
    pub old_pin: String,
    pub new_pin: String,
}

/// Session context carried by the access token and handed to every
/// protected handler through request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Member id
    pub sub: String,
    pub name: String,
    pub role: MemberRole,
    /// Expiration timestamp
    pub exp: usize,
    /// Issued at
    pub iat: usize,
}

impl SessionClaims {
    pub fn is_leader(&self) -> bool {
        self.role == MemberRole::Leader
    }
}
