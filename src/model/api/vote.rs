use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    api::{candidate::Candidate, election::Election, user::User},
    common::{timestamp::naive_utc, CandidateId, ElectionId, VoteId, VoterId},
};

/// A ballot cast for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
    pub election_id: ElectionId,
}

/// The backend's record of an accepted ballot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub id: VoteId,
    #[serde(default, with = "naive_utc::option")]
    pub cast_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub voter: Option<User>,
    #[serde(default)]
    pub candidate: Option<Candidate>,
    #[serde(default)]
    pub election: Option<Election>,
}
