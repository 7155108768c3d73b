use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::error::Result;
use crate::lifecycle::{ElectionStatus, LifecycleEvaluator};
use crate::model::common::Role;

use super::ApiClient;

/// Headline figures for whoever is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "role")]
pub enum Dashboard {
    #[serde(rename = "ADMIN", rename_all = "camelCase")]
    Admin {
        total_elections: usize,
        total_candidates: usize,
        total_users: usize,
    },
    /// The voter's eligible elections, by status.
    #[serde(rename = "VOTER")]
    Voter {
        upcoming: usize,
        ongoing: usize,
        completed: usize,
    },
}

impl Display for Dashboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dashboard::Admin {
                total_elections,
                total_candidates,
                total_users,
            } => write!(
                f,
                "Elections: {total_elections}\nCandidates: {total_candidates}\nUsers: {total_users}"
            ),
            Dashboard::Voter {
                upcoming,
                ongoing,
                completed,
            } => write!(
                f,
                "Upcoming: {upcoming}\nOngoing: {ongoing}\nCompleted: {completed}"
            ),
        }
    }
}

impl ApiClient {
    pub async fn dashboard(&self) -> Result<Dashboard> {
        self.dashboard_at(&LifecycleEvaluator::now()).await
    }

    /// As [`ApiClient::dashboard`], with statuses judged at the evaluator's
    /// instant.
    pub async fn dashboard_at(&self, evaluator: &LifecycleEvaluator) -> Result<Dashboard> {
        match self.signed_in()?.role() {
            Role::Admin => Ok(Dashboard::Admin {
                total_elections: self.elections().await?.len(),
                total_candidates: self.candidates().await?.len(),
                total_users: self.users().await?.len(),
            }),
            Role::Voter => {
                let elections = self.eligible_elections().await?;
                let count = |status| {
                    elections
                        .iter()
                        .filter(|election| evaluator.status_of(election) == status)
                        .count()
                };
                Ok(Dashboard::Voter {
                    upcoming: count(ElectionStatus::Upcoming),
                    ongoing: count(ElectionStatus::Ongoing),
                    completed: count(ElectionStatus::Completed),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::error::Error;
    use crate::model::api::{AllowedVoter, Candidate, Election, User};

    #[api_test(admin)]
    async fn admin_totals(server: MockServer, client: ApiClient) {
        Mock::given(method("GET"))
            .and(path("/api/elections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![
                Election::past_example(),
                Election::current_example(),
                Election::future_example(),
            ]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/candidates"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(vec![Candidate::example1(), Candidate::example2()]),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![User::example_admin()]))
            .mount(&server)
            .await;

        let dashboard = client.dashboard().await.unwrap();
        assert_eq!(
            dashboard,
            Dashboard::Admin {
                total_elections: 3,
                total_candidates: 2,
                total_users: 1,
            }
        );
        assert_eq!(dashboard.to_string(), "Elections: 3\nCandidates: 2\nUsers: 1");
    }

    #[api_test(voter)]
    async fn voter_breakdown(server: MockServer, client: ApiClient) {
        Mock::given(method("GET"))
            .and(path("/api/allowed-voters/voter/VTR-1001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![
                AllowedVoter::example(1, Election::past_example()),
                AllowedVoter::example(2, Election::past_example()),
                AllowedVoter::example(3, Election::current_example()),
            ]))
            .mount(&server)
            .await;

        let dashboard = client.dashboard().await.unwrap();
        assert_eq!(
            dashboard,
            Dashboard::Voter {
                upcoming: 0,
                ongoing: 1,
                completed: 2,
            }
        );
        assert!(server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .all(|request| request.url.path() != "/api/users"));
    }

    #[api_test]
    async fn needs_a_session(server: MockServer, client: ApiClient) {
        assert!(matches!(client.dashboard().await, Err(Error::Unauthorized(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
