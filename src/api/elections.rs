use log::info;

use crate::error::Result;
use crate::model::api::{Election, ElectionSpec, ElectionState};
use crate::model::common::{ElectionId, Role};

use super::ApiClient;

impl ApiClient {
    pub async fn elections(&self) -> Result<Vec<Election>> {
        self.signed_in()?;
        self.get(&["elections"]).await
    }

    /// A single election, with its candidates embedded.
    pub async fn election(&self, id: ElectionId) -> Result<Election> {
        self.signed_in()?;
        self.get(&["elections", &id.to_string()]).await
    }

    /// Elections by their stored status column. This is whatever an admin
    /// last saved, not the status derived from the clock.
    pub async fn elections_by_state(&self, state: ElectionState) -> Result<Vec<Election>> {
        self.signed_in()?;
        self.get(&["elections", "status", &state.to_string()]).await
    }

    pub async fn create_election(&self, spec: &ElectionSpec) -> Result<Election> {
        self.require(Role::Admin)?;
        spec.validate()?;
        let election: Election = self.post(&["elections"], spec).await?;
        info!("Created election {} ({})", election.id, election.title);
        Ok(election)
    }

    pub async fn update_election(&self, id: ElectionId, spec: &ElectionSpec) -> Result<Election> {
        self.require(Role::Admin)?;
        spec.validate()?;
        self.put(&["elections", &id.to_string()], spec).await
    }

    pub async fn delete_election(&self, id: ElectionId) -> Result<()> {
        self.require(Role::Admin)?;
        self.delete(&["elections", &id.to_string()]).await?;
        info!("Deleted election {id}");
        Ok(())
    }
}
