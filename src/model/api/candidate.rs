use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::{election::Election, party::Party},
    common::{image::Image, CandidateId, ElectionId, PartyId},
};

/// A candidate standing for a party in one election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo: Option<Image>,
    #[serde(default)]
    pub party: Option<Party>,
    #[serde(default)]
    pub election: Option<Election>,
}

impl Candidate {
    pub fn party_name(&self) -> Option<&str> {
        self.party.as_ref().map(|party| party.name.as_str())
    }

    pub fn election_title(&self) -> Option<&str> {
        self.election.as_ref().map(|election| election.title.as_str())
    }
}

/// Sent when creating or editing a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Image>,
    pub party_id: PartyId,
    pub election_id: ElectionId,
}

impl CandidateSpec {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("name", "candidate name must not be empty"));
        }
        Ok(())
    }
}
