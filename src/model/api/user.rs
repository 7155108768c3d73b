use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{Role, UserId, VoterId};

/// A registered account, as returned by the backend. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub voter_id: Option<VoterId>,
    pub role: Role,
}

/// Raw registration details, received from a user. The password is in
/// plaintext and goes straight to the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    pub username: String,
    pub email: String,
    /// Required for voters, absent for admins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<VoterId>,
    pub role: Role,
    pub password: String,
}

impl UserSpec {
    /// A self-service voter registration.
    pub fn voter(username: String, email: String, voter_id: VoterId, password: String) -> Self {
        Self {
            username,
            email,
            voter_id: Some(voter_id),
            role: Role::Voter,
            password,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::invalid("username", "username must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(Error::invalid(
                "email",
                format!("`{}` is not an email address", self.email),
            ));
        }
        if self.password.is_empty() {
            return Err(Error::invalid("password", "password must not be empty"));
        }
        if self.role == Role::Voter
            && self
                .voter_id
                .as_deref()
                .map_or(true, |id| id.trim().is_empty())
        {
            return Err(Error::invalid("voterId", "voters must have a voter id"));
        }
        Ok(())
    }
}

/// Keeps the password out of logs.
impl std::fmt::Debug for UserSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSpec")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("voter_id", &self.voter_id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
