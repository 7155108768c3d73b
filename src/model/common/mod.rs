use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub mod image;
pub mod timestamp;

pub type ElectionId = u64;

pub type CandidateId = u64;

pub type PartyId = u64;

pub type UserId = u64;

/// Identifies one entry of an election's eligibility list.
pub type AllowedVoterId = u64;

pub type VoteId = u64;

/// The voter's public identifier, assigned at registration. Opaque.
pub type VoterId = String;

/// What a signed-in user is allowed to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Voter,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Voter => write!(f, "VOTER"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "VOTER" => Ok(Role::Voter),
            other => Err(Error::invalid("role", format!("unknown role `{other}`"))),
        }
    }
}
