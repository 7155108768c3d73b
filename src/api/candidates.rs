use crate::error::Result;
use crate::model::api::{Candidate, CandidateSpec};
use crate::model::common::{CandidateId, Role};

use super::ApiClient;

impl ApiClient {
    /// Every candidate in every election.
    pub async fn candidates(&self) -> Result<Vec<Candidate>> {
        self.signed_in()?;
        self.get(&["candidates"]).await
    }

    pub async fn create_candidate(&self, spec: &CandidateSpec) -> Result<Candidate> {
        self.require(Role::Admin)?;
        spec.validate()?;
        self.post(&["candidates"], spec).await
    }

    pub async fn update_candidate(&self, id: CandidateId, spec: &CandidateSpec) -> Result<Candidate> {
        self.require(Role::Admin)?;
        spec.validate()?;
        self.put(&["candidates", &id.to_string()], spec).await
    }

    pub async fn delete_candidate(&self, id: CandidateId) -> Result<()> {
        self.require(Role::Admin)?;
        self.delete(&["candidates", &id.to_string()]).await
    }
}
