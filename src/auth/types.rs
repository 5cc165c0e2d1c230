//! Types for authentication and account management

use serde::{Deserialize, Serialize};

/// Platform role attached to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Participates in events
    Athlete,
    /// Creates and manages events
    Organizer,
}

impl Role {
    /// The wire representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Athlete => "athlete",
            Role::Organizer => "organizer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// The account ID
    pub id: i64,

    /// The account's email address
    pub email: String,

    /// The account's role
    pub role: Role,

    /// Display name, possibly blank
    #[serde(default)]
    pub full_name: String,

    /// Public handle, possibly blank
    #[serde(default)]
    pub handle: String,

    /// The access token
    pub access: String,

    /// The refresh token
    pub refresh: String,
}

/// Registration payload for a new account
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Email address, also used as the login identifier
    pub email: String,

    /// Password (at least 8 characters server-side)
    pub password: String,

    /// Must match `password`
    pub confirm_password: String,

    /// Requested role
    pub role: Role,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,
}

/// Response of the current-account endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The account ID
    pub id: i64,

    /// The account's email address
    pub email: String,

    /// The account's role
    pub role: Role,

    /// Public handle, possibly blank
    #[serde(default)]
    pub handle: String,

    /// Display name, possibly blank
    #[serde(default)]
    pub full_name: String,
}

/// Full profile record; email and role are read-only server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address_line: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub organization_website: String,
    #[serde(default)]
    pub organization_type: String,
    #[serde(default)]
    pub organization_description: String,
}

/// Profile fields that can be updated; absent fields are left untouched.
/// Organization fields are ignored server-side for non-organizer accounts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_description: Option<String>,
}

/// Success body of the token-refresh endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefreshResponse {
    /// New access token; a refresh that yields none is treated as failed
    #[serde(default)]
    pub access: Option<String>,
}
