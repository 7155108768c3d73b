use serde::{Deserialize, Serialize};

use crate::model::common::{Role, VoterId};

/// Raw login credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// What the backend hands back on a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub voter_id: Option<VoterId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod examples {
    use super::*;

    impl Credentials {
        pub fn example() -> Self {
            Self {
                email: "priya@example.org".into(),
                password: "correct horse".into(),
            }
        }
    }
}
