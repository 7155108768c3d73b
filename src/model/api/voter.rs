use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::election::Election,
    common::{AllowedVoterId, ElectionId, VoterId},
};

/// One entry of an election's eligibility list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedVoter {
    pub id: AllowedVoterId,
    pub voter_id: VoterId,
    #[serde(default)]
    pub election: Option<Election>,
}

/// Sent to make a voter eligible for an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedVoterSpec {
    pub voter_id: VoterId,
    pub election_id: ElectionId,
}

impl AllowedVoterSpec {
    pub fn validate(&self) -> Result<()> {
        if self.voter_id.trim().is_empty() {
            return Err(Error::invalid("voterId", "voter id must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl AllowedVoter {
        pub fn example(id: AllowedVoterId, election: Election) -> Self {
            Self {
                id,
                voter_id: "VTR-1001".to_string(),
                election: Some(election),
            }
        }
    }
}
