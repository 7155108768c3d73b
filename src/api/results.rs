use crate::error::Result;
use crate::filter::ResultsFilter;
use crate::lifecycle::{LifecycleEvaluator, ResultReport};
use crate::model::api::ElectionResult;
use crate::model::common::{ElectionId, Role};

use super::ApiClient;

impl ApiClient {
    /// Results of one election as the backend reports them to voters.
    pub async fn election_result(&self, id: ElectionId) -> Result<ElectionResult> {
        self.signed_in()?;
        self.get(&["results", "election", &id.to_string()]).await
    }

    /// Results of one election with the admin-only detail.
    pub async fn admin_election_result(&self, id: ElectionId) -> Result<ElectionResult> {
        self.require(Role::Admin)?;
        self.get(&["admin", "results", "election", &id.to_string()])
            .await
    }

    pub async fn all_results(&self) -> Result<Vec<ElectionResult>> {
        self.require(Role::Admin)?;
        self.get(&["admin", "results", "all"]).await
    }

    /// One election's result, recounted and gated on its status right now.
    /// Admins get the detailed endpoint and see running counts. Everyone
    /// else gets the voter endpoint and no counts until the election ends.
    pub async fn election_report(&self, id: ElectionId) -> Result<ResultReport> {
        self.election_report_at(id, &LifecycleEvaluator::now()).await
    }

    pub async fn election_report_at(
        &self,
        id: ElectionId,
        evaluator: &LifecycleEvaluator,
    ) -> Result<ResultReport> {
        if self.signed_in()?.role() == Role::Admin {
            let result = self.admin_election_result(id).await?;
            evaluator.report(&result)
        } else {
            let result = self.election_result(id).await?;
            Ok(evaluator.report(&result)?.for_voter())
        }
    }

    /// Reports for every election that has opened, narrowed by `filter`.
    pub async fn results_overview(&self, filter: ResultsFilter) -> Result<Vec<ResultReport>> {
        self.results_overview_at(filter, &LifecycleEvaluator::now())
            .await
    }

    /// As [`ApiClient::results_overview`], with every status judged at the
    /// evaluator's instant.
    pub async fn results_overview_at(
        &self,
        filter: ResultsFilter,
        evaluator: &LifecycleEvaluator,
    ) -> Result<Vec<ResultReport>> {
        let results = self.all_results().await?;
        filter
            .apply(&results, evaluator)
            .into_iter()
            .map(|result| evaluator.report(result))
            .collect()
    }
}
