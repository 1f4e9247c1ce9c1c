use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Inventory management staff.
    #[serde(rename = "INVTEAM")]
    InvTeam,
    /// Delivery agents.
    #[serde(rename = "DLTEAM")]
    DlTeam,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::InvTeam, Role::DlTeam];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::InvTeam => "INVTEAM",
            Role::DlTeam => "DLTEAM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::InvTeam => "Inventory Team",
            Role::DlTeam => "Delivery Team",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INVTEAM" => Ok(Role::InvTeam),
            "DLTEAM" => Ok(Role::DlTeam),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn initial(&self) -> char {
        self.full_name.chars().next().unwrap_or('U')
    }
}

/// Payload of a successful login (`/auth/login`, `/auth/google/callback`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl LoginResponse {
    pub fn user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            phone_number: None,
        }
    }
}
