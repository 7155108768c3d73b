use log::debug;

use crate::error::Result;
use crate::filter;
use crate::lifecycle::LifecycleEvaluator;
use crate::model::api::{AllowedVoter, AllowedVoterSpec, Election};
use crate::model::common::{AllowedVoterId, ElectionId, Role};

use super::ApiClient;

/// Eligibility lists.
impl ApiClient {
    pub async fn allowed_voters(&self, election: ElectionId) -> Result<Vec<AllowedVoter>> {
        self.require(Role::Admin)?;
        self.get(&["allowed-voters", "election", &election.to_string()])
            .await
    }

    pub async fn add_allowed_voter(&self, spec: &AllowedVoterSpec) -> Result<AllowedVoter> {
        self.require(Role::Admin)?;
        spec.validate()?;
        self.post(&["allowed-voters"], spec).await
    }

    pub async fn remove_allowed_voter(&self, id: AllowedVoterId) -> Result<()> {
        self.require(Role::Admin)?;
        self.delete(&["allowed-voters", &id.to_string()]).await
    }

    /// Elections the signed-in voter is on the list for, whatever their status.
    pub async fn eligible_elections(&self) -> Result<Vec<Election>> {
        let voter_id = self.require(Role::Voter)?.voter_id()?;
        let entries: Vec<AllowedVoter> = self.get(&["allowed-voters", "voter", voter_id]).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                if entry.election.is_none() {
                    debug!("Eligibility entry {} has no election attached", entry.id);
                }
                entry.election
            })
            .collect())
    }

    /// Eligible elections that are taking ballots right now.
    pub async fn open_elections(&self) -> Result<Vec<Election>> {
        self.open_elections_at(&LifecycleEvaluator::now()).await
    }

    /// As [`ApiClient::open_elections`], judged at the evaluator's instant.
    pub async fn open_elections_at(&self, evaluator: &LifecycleEvaluator) -> Result<Vec<Election>> {
        let eligible = self.eligible_elections().await?;
        Ok(filter::open_elections(&eligible, evaluator)
            .into_iter()
            .cloned()
            .collect())
    }
}
