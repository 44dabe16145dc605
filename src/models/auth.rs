use serde::{Deserialize, Serialize};

/// Body of `POST login`. The backend expects the password under `contrasena`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// Authenticated user as returned by `auth/me` and embedded in the login reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Reply of `POST login`.
///
/// The backend spells the token key `acces_token`; the correctly spelled key
/// is accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "acces_token", alias = "access_token")]
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// A validated session: the token plus the user `auth/me` resolved it to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}
